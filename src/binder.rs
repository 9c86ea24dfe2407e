use crate::domain::{Centre, Fragment, LocationLookup, LocationName, LocationsDocument};
use crate::errors::error_chain_fmt;
use crate::source::{LocationSource, SourceError};
use crate::view::{LinkList, LinkTemplates, MapView};
use std::collections::HashSet;
use tokio::sync::mpsc;

/// Zoom level the map is panned to when none is configured.
pub const DEFAULT_ZOOM: u8 = 11;

#[derive(thiserror::Error)]
pub enum BinderError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Location '{0}' appears more than once in the locations document")]
    DuplicateName(LocationName),
    #[error("Failed to render the link for location '{0}'")]
    Render(LocationName, #[source] minijinja::Error),
}
impl std::fmt::Debug for BinderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// What a fragment sync did to the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The map was panned to this centre.
    Centred(Centre),
    /// The fragment names no known location; the map was left alone.
    Unresolved,
}

/// Binds a list of location links and a map to the page's URL fragment.
///
/// Starts out loading with an empty lookup, in which every fragment sync is
/// a no-op. Applying the fetched document fills the list and the lookup in
/// one go, after which fragments resolve to map pans.
#[derive(Debug)]
pub struct LocationBinder<M, L> {
    lookup: LocationLookup,
    templates: LinkTemplates,
    map: M,
    list: L,
    zoom: u8,
    loaded: bool,
}

impl<M: MapView, L: LinkList> LocationBinder<M, L> {
    pub fn new(map: M, list: L, zoom: u8) -> Self {
        Self {
            lookup: LocationLookup::new(),
            templates: LinkTemplates::new(),
            map,
            list,
            zoom,
            loaded: false,
        }
    }

    pub fn lookup(&self) -> &LocationLookup {
        &self.lookup
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    /// Whether a document has been applied, even one without locations.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch the locations, fill the list and the lookup, then centre the
    /// map on `current_fragment` once.
    ///
    /// A failed fetch leaves the list empty and the map untouched.
    pub async fn initialize<S: LocationSource>(
        &mut self,
        source: &S,
        current_fragment: &Fragment,
    ) -> Result<SyncOutcome, BinderError> {
        let document = source.fetch().await?;
        self.apply(document)?;
        Ok(self.sync_map_to_fragment(current_fragment))
    }

    /// Append a link and a lookup entry for every location, in document order.
    ///
    /// Names are checked for uniqueness and every link is rendered before
    /// anything is touched, so either every location is bound or none is.
    pub fn apply(&mut self, document: LocationsDocument) -> Result<usize, BinderError> {
        let mut seen = HashSet::with_capacity(document.len());
        for location in &document.locations {
            if !seen.insert(location.name.as_str()) || self.lookup.contains(location.name.as_str())
            {
                return Err(BinderError::DuplicateName(location.name.clone()));
            }
        }

        let links = document
            .locations
            .iter()
            .map(|location| {
                self.templates
                    .render_link(location)
                    .map_err(|e| BinderError::Render(location.name.clone(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = document.len();
        for (location, link) in document.locations.into_iter().zip(links) {
            self.list.append_link(link);
            if let Err(location) = self.lookup.insert(location) {
                return Err(BinderError::DuplicateName(location.name));
            }
        }
        self.list.populated();
        self.loaded = true;

        tracing::info!(locations = count, "Bound locations to list and map");
        Ok(count)
    }

    /// Pan the map to the location named by `fragment`, if there is one.
    pub fn sync_map_to_fragment(&mut self, fragment: &Fragment) -> SyncOutcome {
        match self.lookup.get(fragment.as_str()) {
            Some(location) => {
                tracing::debug!(?location, "Centring map on location");
                self.map.pan_to(location.centre, self.zoom);
                SyncOutcome::Centred(location.centre)
            }
            None => {
                tracing::debug!(
                    %fragment,
                    loaded = self.is_loaded(),
                    "Fragment does not name a known location"
                );
                SyncOutcome::Unresolved
            }
        }
    }

    /// Drive the binder for the lifetime of a page.
    ///
    /// Fragment changes are listened to while the document is still loading
    /// and resolve to nothing until it has been applied. Once it is, the map
    /// is centred on the latest fragment and then follows every change until
    /// `fragment_changes` closes. The binder is handed back at that point.
    #[tracing::instrument(name = "Running location binder", skip_all, fields(%initial_fragment))]
    pub async fn run<S: LocationSource>(
        mut self,
        source: &S,
        initial_fragment: Fragment,
        mut fragment_changes: mpsc::Receiver<Fragment>,
    ) -> Result<Self, BinderError> {
        let mut current = initial_fragment;
        let mut changes_open = true;

        let load = source.fetch();
        tokio::pin!(load);

        let document = loop {
            tokio::select! {
                biased;
                change = fragment_changes.recv(), if changes_open => match change {
                    Some(fragment) => {
                        self.sync_map_to_fragment(&fragment);
                        current = fragment;
                    }
                    None => changes_open = false,
                },
                document = &mut load => break document,
            }
        };

        let document = document.map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Failed to load locations");
            e
        })?;
        self.apply(document)?;
        self.sync_map_to_fragment(&current);

        while let Some(fragment) = fragment_changes.recv().await {
            self.sync_map_to_fragment(&fragment);
        }

        Ok(self)
    }
}
