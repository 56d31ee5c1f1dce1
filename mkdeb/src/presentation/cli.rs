use clap::Parser;
use mkdeb_core::CompressAlgorithm;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mkdeb",
    about = "Build a Debian binary package from a JSON manifest",
    long_about = None,
    disable_version_flag = true
)]
pub struct Cli {
    /// Show build information and exit
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Path to root directory for input files
    #[arg(short = 'R', long = "root", default_value = ".")]
    pub root: PathBuf,

    /// Path to input manifest file (JSON)
    #[arg(short = 'm', long = "manifest")]
    pub manifest: Option<PathBuf>,

    /// Path to output .deb package file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Compression algorithm: {auto|none|gzip|bzip2|xz|zstd}
    #[arg(short = 'c', long = "compression", default_value = "auto")]
    pub compression: CompressAlgorithm,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["mkdeb", "-R", "/src", "-m", "m.json", "-o", "out.deb", "-c", "xz"])
            .unwrap();
        assert_eq!(cli.root, PathBuf::from("/src"));
        assert_eq!(cli.manifest, Some(PathBuf::from("m.json")));
        assert_eq!(cli.output, Some(PathBuf::from("out.deb")));
        assert_eq!(cli.compression, CompressAlgorithm::Xz);
        assert!(!cli.version);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["mkdeb"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.compression, CompressAlgorithm::Auto);
        assert_eq!(cli.manifest, None);
    }

    #[test]
    fn unknown_compression_rejected() {
        assert!(Cli::try_parse_from(["mkdeb", "-c", "lz4"]).is_err());
    }
}
