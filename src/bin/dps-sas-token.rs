use anyhow::{Context, Result};
use azure_dps_sas::ProvisioningSettings;
use config::Environment;
use log::info;

/// Values stay strings until serde picks the field type, so ids such as
/// `00123` keep their leading zeros.
fn load_settings(environment: Environment) -> Result<ProvisioningSettings> {
    config::Config::builder()
        .add_source(config::File::with_name("dps").required(false))
        .add_source(environment)
        .build()
        .context("reading DPS settings")?
        .try_deserialize()
        .context("DPS_SCOPE_ID, DPS_REGISTRATION_ID and DPS_DEVICE_KEY must be set")
}

fn run() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = load_settings(Environment::with_prefix("DPS"))?;
    info!("loaded {:?}", settings);

    let token = settings
        .generate_token()
        .context("generating SAS token")?;

    println!(" - URI:");
    println!("{}", settings.resource_uri());
    println!(" - Authorization header:");
    println!("{}", token);

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
