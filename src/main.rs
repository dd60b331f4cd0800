//! Host-side helper: `check` validates the static assets the surface loads,
//! `serve` builds the WASM package into `static/pkg` and serves `static/`.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::{Path, PathBuf};
    use std::process::{Command, Stdio};
    use std::{thread, time::Duration};

    use anyhow::{bail, Context, Result};
    use clap::{Parser, Subcommand};
    use reveal_wasm::config::{FrameSource, RevealConfig};

    #[derive(Parser, Debug)]
    #[command(about = "Build, check and serve the chest surface")]
    struct Cli {
        /// Directory served as the site root.
        #[arg(long, default_value = "static")]
        root: PathBuf,
        #[command(subcommand)]
        command: Cmd,
    }

    #[derive(Subcommand, Debug)]
    enum Cmd {
        /// Verify the base video and every overlay frame exist and match in size.
        Check,
        /// Build with wasm-pack and serve the site root.
        Serve {
            #[arg(long, default_value_t = 8000)]
            port: u16,
            /// Skip the wasm-pack build and serve existing artifacts.
            #[arg(long)]
            no_build: bool,
        },
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();
        let config = RevealConfig::default();
        config.validate().context("default configuration is invalid")?;
        match cli.command {
            Cmd::Check => check(&cli.root, &config),
            Cmd::Serve { port, no_build } => {
                if !no_build {
                    build_pkg(&cli.root)?;
                }
                serve(&cli.root, port)
            }
        }
    }

    /// Map a site-absolute URL like `/chest/a.jpg` under `root`.
    fn site_path(root: &Path, url: &str) -> PathBuf {
        root.join(url.trim_start_matches('/'))
    }

    fn check(root: &Path, config: &RevealConfig) -> Result<()> {
        let video = site_path(root, &config.base_video_url);
        if !video.is_file() {
            bail!("base video missing: {}", video.display());
        }
        let size = check_frames(root, &config.frames)?;
        log::info!(
            "ok: {} and {} frames of {}x{}",
            video.display(),
            config.frames.count,
            size.0,
            size.1
        );
        Ok(())
    }

    fn check_frames(root: &Path, frames: &FrameSource) -> Result<(u32, u32)> {
        let mut expected = None;
        for (slot, url) in frames.urls().enumerate() {
            let path = site_path(root, &url);
            let dims = image::image_dimensions(&path)
                .with_context(|| format!("frame {slot}: cannot read {}", path.display()))?;
            match expected {
                None => expected = Some(dims),
                Some(first) if first != dims => bail!(
                    "frame {slot} ({}) is {}x{}, expected {}x{}",
                    path.display(),
                    dims.0,
                    dims.1,
                    first.0,
                    first.1
                ),
                Some(_) => {}
            }
        }
        expected.context("frame sequence is empty")
    }

    fn build_pkg(root: &Path) -> Result<()> {
        log::info!("building WASM pkg …");
        let out_dir = root.join("pkg");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(&out_dir)
            .status()
            .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
        if !status.success() {
            bail!("wasm-pack finished with {status}");
        }
        Ok(())
    }

    fn serve(root: &Path, port: u16) -> Result<()> {
        log::info!("launching local server at http://127.0.0.1:{port} …");
        let mut server = Command::new("python3")
            .args(["-m", "http.server", &port.to_string(), "--directory"])
            .arg(root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start http server (python3)")?;

        loop {
            if let Some(status) = server.try_wait()? {
                bail!("http server exited with {status}");
            }
            thread::sleep(Duration::from_secs(1));
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn site_paths_are_rooted() {
            let p = site_path(Path::new("static"), "/chest/chest_00001.jpg");
            assert_eq!(p, Path::new("static/chest/chest_00001.jpg"));
        }

        #[test]
        fn serve_only_takes_local_options() {
            let cli = Cli::try_parse_from(["reveal_wasm", "serve", "--port", "9000", "--no-build"])
                .unwrap();
            assert!(matches!(cli.command, Cmd::Serve { port: 9000, no_build: true }));
            assert!(Cli::try_parse_from(["reveal_wasm", "serve", "--ngrok"]).is_err());
        }
    }
}
