use anyhow::{bail, Context, Result};
use jetimg::io::{load_json, read_archive, save_json, write_archive, ImageArchive, SplitKind};
use jetimg::pipeline::{build_archive, PipelineConfig};
use log::info;
use std::path::Path;

const USAGE: &str = "usage:
  jetimg-cli <config.json>            build an image archive
  jetimg-cli inspect <archive>        print split sizes and signal fractions
  jetimg-cli init <config.json>       write a starter config";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, path] if cmd == "inspect" => inspect(Path::new(path)),
        [cmd, path] if cmd == "init" => init(Path::new(path)),
        [config] if config != "-h" && config != "--help" => build(Path::new(config)),
        _ => {
            eprintln!("{}", USAGE);
            bail!("expected a config path or a subcommand");
        }
    }
}

fn build(config_path: &Path) -> Result<()> {
    let config: PipelineConfig = load_json(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", config_path.display()))?;

    let archive = build_archive(&config).context("building image archive")?;
    write_archive(&config.output, &archive)
        .with_context(|| format!("writing archive {}", config.output.display()))?;
    info!("done");
    print_summary(&archive);
    Ok(())
}

fn inspect(archive_path: &Path) -> Result<()> {
    let archive = read_archive(archive_path)
        .with_context(|| format!("reading archive {}", archive_path.display()))?;
    let c = &archive.config;
    println!("archive {}", archive_path.display());
    println!(
        "  grid {}x{}  eta [{}, {}]  phi [{}, {}]  log range [{}, {}]  slots {}",
        c.bins_eta,
        c.bins_phi,
        c.eta_range.lo,
        c.eta_range.hi,
        c.phi_range.lo,
        c.phi_range.hi,
        c.log_range.lo,
        c.log_range.hi,
        c.slots
    );
    print_summary(&archive);
    Ok(())
}

fn init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }
    let config = PipelineConfig::separate("train.csv", "test.csv", "val.csv", "jet_images.bin");
    save_json(&config, config_path)
        .with_context(|| format!("writing config {}", config_path.display()))?;
    println!("wrote {}", config_path.display());
    Ok(())
}

fn print_summary(archive: &ImageArchive) {
    for kind in SplitKind::ALL {
        let split = archive.split(kind);
        let fraction = split
            .signal_fraction()
            .map_or_else(|| "-".to_string(), |f| format!("{:.3}", f));
        println!(
            "  {:<10} {:>8} images {}  {:>6.1}% nonzero pixels  signal fraction {}",
            kind.as_str(),
            split.len(),
            split.images().shape(),
            nonzero_percent(split.images().count_nonzero(), split.images().numel()),
            fraction
        );
    }
}

fn nonzero_percent(nonzero: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * nonzero as f64 / total as f64
    }
}
