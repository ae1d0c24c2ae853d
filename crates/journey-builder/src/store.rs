use crate::config::AppConfig;
use crate::forms::Drafts;
use crate::identity::{IdIssuer, LocalIssuer, assign_missing_ids};
use crate::layout_settings::LayoutSettings;
use crate::versioned::Versioned;
use journey::{GraphStore, Journey, JourneyRepository, Selection};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Journey,
    Properties,
    Nodes,
    Functions,
    Mappings,
    Edges,
    Preview,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 7] = [
        Self::Journey,
        Self::Properties,
        Self::Nodes,
        Self::Functions,
        Self::Mappings,
        Self::Edges,
        Self::Preview,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Journey => "Journey",
            Self::Properties => "Properties",
            Self::Nodes => "Nodes",
            Self::Functions => "Functions",
            Self::Mappings => "Mappings",
            Self::Edges => "Edges",
            Self::Preview => "Preview",
        }
    }

    pub fn next(&self) -> Option<ActiveTab> {
        let pos = Self::ALL.iter().position(|t| t == self)?;
        Self::ALL.get(pos + 1).copied()
    }

    pub fn previous(&self) -> Option<ActiveTab> {
        let pos = Self::ALL.iter().position(|t| t == self)?;
        pos.checked_sub(1).map(|p| Self::ALL[p])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// List of saved journeys.
    Library,
    /// Editing the open journey. `preview_only` locks the flow to the
    /// preview tab.
    Editor { preview_only: bool },
}

/// All application state. The open journey is the only model state; the
/// rest is presentation.
pub struct Store {
    pub library: Vec<Journey>,
    pub journey: Versioned<GraphStore>,
    pub selection: Selection,
    pub screen: Screen,
    pub active_tab: ActiveTab,
    pub drafts: Drafts,
    pub settings: LayoutSettings,
    pub config: AppConfig,
    pub repository: JourneyRepository,
    pub issuer: Box<dyn IdIssuer>,
    /// Set by a graph store observer whenever the open journey changes.
    pub unsaved: Rc<Cell<bool>>,
    pub preview_layout_reset_needed: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(config: AppConfig, repository: JourneyRepository) -> Self {
        let library = repository.load();
        let unsaved = Rc::new(Cell::new(false));
        let mut store = Self {
            library,
            journey: Versioned::new(GraphStore::create_empty()),
            selection: Selection::default(),
            screen: Screen::Library,
            active_tab: ActiveTab::Journey,
            drafts: Drafts::default(),
            settings: config.layout.clone(),
            config,
            repository,
            issuer: Box::new(LocalIssuer),
            unsaved,
            preview_layout_reset_needed: true,
            status_message: None,
            error_message: None,
        };
        store.open(GraphStore::create_empty());
        store
    }

    /// Replace the open journey, wiring the unsaved-changes observer.
    pub fn open(&mut self, mut graph: GraphStore) {
        let flag = self.unsaved.clone();
        graph.subscribe(move |_| flag.set(true));
        self.unsaved.set(false);
        self.journey.set(graph);
        self.selection.clear();
        self.drafts = Drafts::default();
        let journey = self.journey.get().journey();
        self.drafts.journey_name = journey.name.clone();
        self.drafts.journey_description = journey.description.clone();
        self.preview_layout_reset_needed = true;
    }

    pub fn current(&self) -> &Journey {
        self.journey.get().journey()
    }

    /// Run `f` against the graph store, then issue ids for anything it
    /// added and drop a selection that no longer resolves.
    pub fn mutate(&mut self, f: impl FnOnce(&mut GraphStore)) {
        let graph = self.journey.get_mut();
        f(graph);
        assign_missing_ids(graph, &mut self.issuer);
        self.selection.retain_existing(graph.journey());
        self.preview_layout_reset_needed = true;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved.get()
    }

    pub fn mark_saved(&mut self) {
        self.unsaved.set(false);
    }

    pub fn is_preview_only(&self) -> bool {
        matches!(self.screen, Screen::Editor { preview_only: true })
    }
}

impl IdIssuer for Box<dyn IdIssuer> {
    fn issue(&mut self) -> String {
        (**self).issue()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::identity::tests::SequentialIssuer;
    use journey::{NewNode, NodeType};

    pub fn test_store() -> Store {
        let mut store =
            Store::new(AppConfig::default(), JourneyRepository::in_memory());
        store.issuer = Box::new(SequentialIssuer::default());
        store
    }

    #[test]
    fn test_tab_order() {
        assert_eq!(ActiveTab::Journey.previous(), None);
        assert_eq!(ActiveTab::Journey.next(), Some(ActiveTab::Properties));
        assert_eq!(ActiveTab::Edges.next(), Some(ActiveTab::Preview));
        assert_eq!(ActiveTab::Preview.next(), None);
    }

    #[test]
    fn test_mutate_assigns_ids_and_tracks_changes() {
        let mut store = test_store();
        assert!(!store.has_unsaved_changes());
        let version = store.journey.version();

        store.mutate(|g| {
            g.add_node(NewNode::new("A", NodeType::Custom));
        });

        assert!(store.has_unsaved_changes());
        assert!(store.journey.version() > version);
        assert_eq!(store.current().nodes[0].id, "id1");
    }

    #[test]
    fn test_open_resets_presentation_state() {
        let mut store = test_store();
        store.mutate(|g| {
            g.seed_start_and_end("s", "e");
        });
        store.selection.toggle("s");

        let mut other = Journey::empty();
        other.name = "Other".to_string();
        store.open(GraphStore::from_journey(other));

        assert_eq!(store.selection.selected(), None);
        assert_eq!(store.drafts.journey_name, "Other");
        assert!(!store.has_unsaved_changes());
    }
}
