use crate::binder::LocationBinder;
use crate::configuration::Settings;
use crate::domain::Fragment;
use crate::source::HttpLocationSource;
use crate::view::JsonLinesView;
use std::io::Stdout;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Capacity of the fragment-change channel between the reader and the binder.
const FRAGMENT_CHANGES_CAPACITY: usize = 64;

type StdoutView = JsonLinesView<Stdout>;

pub struct Application {
    source: HttpLocationSource,
    binder: LocationBinder<StdoutView, StdoutView>,
}
impl Application {
    pub fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let source = HttpLocationSource::from_settings(&configuration.application)?;
        let container_id = configuration.list.container_id;

        let binder = LocationBinder::new(
            JsonLinesView::new(container_id.clone(), std::io::stdout()),
            JsonLinesView::new(container_id, std::io::stdout()),
            configuration.map.zoom,
        );

        Ok(Self { source, binder })
    }

    pub fn locations_url(&self) -> &str {
        self.source.url()
    }

    /// Bind the page at `address`, following fragment changes read one per
    /// line from `input` until it is exhausted.
    pub async fn run_until_stopped<R>(self, address: &str, input: R) -> Result<(), anyhow::Error>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(FRAGMENT_CHANGES_CAPACITY);
        let reader = tokio::spawn(forward_fragment_changes(input, sender));

        let outcome = self
            .binder
            .run(&self.source, Fragment::of_address(address), receiver)
            .await;

        match outcome {
            Ok(binder) => {
                tracing::info!(
                    locations = binder.lookup().len(),
                    "Fragment changes exhausted, stopping"
                );
                reader.await??;
                Ok(())
            }
            Err(e) => {
                reader.abort();
                Err(e.into())
            }
        }
    }
}

/// Turn each input line into a fragment change.
pub async fn forward_fragment_changes<R>(
    input: R,
    sender: mpsc::Sender<Fragment>,
) -> Result<(), std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if sender.send(Fragment::parse(&line)).await.is_err() {
            // The binder stopped listening.
            break;
        }
    }
    Ok(())
}
