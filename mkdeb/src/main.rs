mod application;
mod presentation;

use std::io;

use mkdeb_core::BuildInfo;
use mkdeb_core::build_info::BuildInfoError;
use tracing_subscriber::EnvFilter;

fn build_info() -> Result<BuildInfo, BuildInfoError> {
    BuildInfo::new()
        .with("version", env!("CARGO_PKG_VERSION"))?
        .with("git.commit", option_env!("MKDEB_GIT_COMMIT").unwrap_or("devel"))?
        .with("git.commitDate", option_env!("MKDEB_GIT_COMMIT_DATE").unwrap_or("devel"))?
        .with("git.treeState", option_env!("MKDEB_GIT_TREE_STATE").unwrap_or("devel"))
}

fn main() {
    // Logs go to stderr so --help and --version output stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MKDEB_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let info = match build_info() {
        Ok(info) => info,
        Err(e) => {
            eprintln!("internal error: {e}");
            std::process::exit(1);
        }
    };

    let code = application::run(
        std::env::args_os(),
        &info,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    std::process::exit(code);
}
