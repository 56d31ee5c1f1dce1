use std::io::{Result, Write};

use digest::DynDigest;

use super::algorithm::HashAlgorithm;

/// Finished digests of one file, in configured algorithm order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Digests(Vec<(HashAlgorithm, Vec<u8>)>);

impl Digests {
    pub fn get(&self, algo: HashAlgorithm) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|(a, _)| *a == algo)
            .map(|(_, d)| d.as_slice())
    }

    pub fn hex(&self, algo: HashAlgorithm) -> Option<String> {
        self.get(algo).map(hex::encode)
    }
}

/// Write sink that feeds every byte to each configured digest.
pub struct MultiHasher {
    hashers: Vec<(HashAlgorithm, Box<dyn DynDigest>)>,
    written: u64,
}

impl MultiHasher {
    pub fn new(algos: &[HashAlgorithm]) -> Self {
        let mut hashers: Vec<(HashAlgorithm, Box<dyn DynDigest>)> = Vec::with_capacity(algos.len());
        for &algo in algos {
            // repeated algorithms would only produce duplicate lines
            if hashers.iter().all(|(a, _)| *a != algo) {
                hashers.push((algo, algo.hasher()));
            }
        }
        Self { hashers, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(self) -> Digests {
        Digests(
            self.hashers
                .into_iter()
                .map(|(algo, h)| (algo, h.finalize().into_vec()))
                .collect(),
        )
    }
}

impl Write for MultiHasher {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        for (_, h) in &mut self.hashers {
            h.update(buf);
        }
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::algorithm::STANDARD_HASHES;
    use sha2::{Digest, Sha256};

    #[test]
    fn feeds_every_algorithm() {
        let mut mh = MultiHasher::new(&STANDARD_HASHES);
        mh.write_all(b"hello ").unwrap();
        mh.write_all(b"world").unwrap();
        assert_eq!(mh.written(), 11);
        let digests = mh.finish();

        assert_eq!(
            digests.hex(HashAlgorithm::Md5).unwrap(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
        assert_eq!(
            digests.hex(HashAlgorithm::Sha1).unwrap(),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
        assert_eq!(
            digests.get(HashAlgorithm::Sha256).unwrap(),
            Sha256::digest(b"hello world").as_slice()
        );
    }

    #[test]
    fn keeps_configured_order() {
        let mh = MultiHasher::new(&[HashAlgorithm::Sha256, HashAlgorithm::Md5, HashAlgorithm::Sha256]);
        let order: Vec<_> = mh.finish().0.into_iter().map(|(a, _)| a).collect();
        assert_eq!(order, vec![HashAlgorithm::Sha256, HashAlgorithm::Md5]);
    }
}
