use locations::configuration::get_configuration;
use locations::startup::Application;
use locations::telemetry::{get_subscriber, init_subscriber};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries view events, so logs go to stderr.
    let subscriber = get_subscriber("locations".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    let address = std::env::args().nth(1).unwrap_or_default();

    let application = Application::build(configuration)?;
    tracing::info!(
        url = application.locations_url(),
        %address,
        "Binding locations to page"
    );

    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = application.run_until_stopped(&address, input).await {
        tracing::error!(error.cause_chain = ?e, "Location binder stopped");
        // The stdin reader may still be parked on a blocking read, which
        // would keep the runtime from shutting down.
        std::process::exit(1);
    }

    Ok(())
}
