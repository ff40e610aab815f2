use anyhow::Result;
use gong_openapi::cli;
use gong_openapi::client::SpecClient;
use gong_openapi::download;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = cli::build_download_cli().get_matches();
    cli::setup_logging(matches.get_flag("debug"))?;

    let config = cli::load_download_config(&matches);
    let client = SpecClient::new(config.base_url.clone(), config.timeout)?;

    eprintln!("Downloading Gong API specification...");
    let path = download::download(&client, &config.spec_version, &config.output, config.pretty)?;
    println!("Saved API specification to {}", path.display());
    Ok(())
}
