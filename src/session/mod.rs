//! Session: the single owner of in-memory state for one running UI.
//!
//! Every mutating operation validates its input first, mutates memory, then
//! rewrites the affected file before returning. If the write fails the error
//! propagates but memory keeps the new state, so the user can retry.

pub mod selection;

pub use selection::Selection;

use crate::events::{EventQueue, FormFields, SessionEvent};
use crate::inventory::{
    Inventory, InventoryStore, Location, Marker, SkippedRecord, ToolPatch, ToolRecord,
};
use crate::locations::{self, LocationRegistry, LocationStore};
use crate::search::{SearchEngine, SearchOutcome};
use crate::types::{
    Borrower, Config, Error, LocationMode, LocationName, Result, ToolName, ToolNumber,
};

/// Engine state for one session.
#[derive(Debug)]
pub struct Session {
    config: Config,
    inventory: Inventory,
    inventory_store: InventoryStore,
    locations: LocationRegistry,
    location_store: LocationStore,
    search: SearchEngine,
    selection: Selection,
    events: EventQueue,
    current_page: u32,
    skipped: Vec<SkippedRecord>,
}

impl Session {
    /// Load inventory and locations from the configured files.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let storage = &config.storage;
        let inventory_store = InventoryStore::new(storage.inventory_path(), storage.atomic_writes);
        let location_store = LocationStore::new(
            storage.locations_path(),
            storage.bindings_path(),
            storage.atomic_writes,
        );

        let report = inventory_store.load_all(&config.inventory)?;
        let locations = location_store.load()?;

        tracing::info!(
            "session_opened: tools={}, skipped={}, locations={}, mode={:?}",
            report.inventory.len(),
            report.skipped.len(),
            locations.len(),
            config.inventory.location_mode
        );

        Ok(Self {
            search: SearchEngine::new(config.search.clone()),
            config,
            inventory: report.inventory,
            inventory_store,
            locations,
            location_store,
            selection: Selection::default(),
            events: EventQueue::default(),
            current_page: 0,
            skipped: report.skipped,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&ToolRecord> {
        self.selection
            .current()
            .and_then(|n| self.inventory.get(n))
    }

    /// Records left out when the inventory file was loaded.
    pub fn skipped_on_load(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    fn mode(&self) -> LocationMode {
        self.config.inventory.location_mode
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Make tool `number` current (direct pick from a list or marker).
    pub fn select(&mut self, number: ToolNumber) -> Result<&ToolRecord> {
        let record = self
            .inventory
            .get(number)
            .ok_or_else(|| Error::validation(format!("unknown tool number {}", number)))?
            .clone();
        self.events.push(SessionEvent::HighlightCleared);
        if let Some(page) = record.location.page() {
            self.show_page(page);
        }
        let fields = self.selection.select(&record).clone();
        self.events.push(SessionEvent::SelectionChanged { fields });
        tracing::debug!("tool_selected: number={}", number);
        self.inventory
            .get(number)
            .ok_or_else(|| Error::validation(format!("unknown tool number {}", number)))
    }

    /// Deselect and blank the form.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.events.push(SessionEvent::HighlightCleared);
        self.events.push(SessionEvent::SelectionCleared);
    }

    /// Nothing stays selected while search results are pending or absent.
    fn drop_selection(&mut self) {
        self.selection.clear();
        self.events.push(SessionEvent::SelectionCleared);
    }

    fn require_selection(&self, action: &str) -> Result<ToolNumber> {
        self.selection
            .current()
            .filter(|n| self.inventory.contains(*n))
            .ok_or_else(|| Error::no_selection(format!("select a tool to {}", action)))
    }

    // =========================================================================
    // Inventory mutations
    // =========================================================================

    /// Add a tool with the next free number.
    pub fn add_tool(&mut self, name: &str, location: &str) -> Result<ToolNumber> {
        let name = ToolName::new(name).map_err(Error::validation)?;
        let location = Location::parse(location, self.mode(), self.current_page)?;
        let number = self.inventory.add_new(name, location)?.number;
        tracing::info!("tool_added: number={}", number);
        self.inventory_changed()?;
        Ok(number)
    }

    /// Form "save": update the selected tool, or add a new one.
    ///
    /// A non-empty number field on a new tool requests that number; on an
    /// existing tool it must match the selected number. The form is cleared
    /// afterwards.
    pub fn save_form(&mut self, form: &FormFields) -> Result<ToolNumber> {
        let requested = match form.number.trim() {
            "" => None,
            text => Some(ToolNumber::parse(text).map_err(Error::validation)?),
        };
        let name = ToolName::new(form.name.as_str()).map_err(Error::validation)?;
        let location = Location::parse(&form.location, self.mode(), self.current_page)?;

        let number = match self.selection.current() {
            Some(current) if self.inventory.contains(current) => {
                if requested.is_some_and(|n| n != current) {
                    return Err(Error::validation(format!(
                        "tool {} cannot be renumbered",
                        current
                    )));
                }
                let patch = ToolPatch {
                    name: Some(name),
                    location: Some(location),
                    borrowed_by: None,
                };
                self.inventory.update(current, patch)?;
                tracing::info!("tool_updated: number={}", current);
                current
            }
            _ => match requested {
                Some(number) => {
                    self.inventory
                        .add(ToolRecord::new(number, name, location))?;
                    tracing::info!("tool_added: number={}", number);
                    number
                }
                None => {
                    let number = self.inventory.add_new(name, location)?.number;
                    tracing::info!("tool_added: number={}", number);
                    number
                }
            },
        };

        self.clear();
        self.inventory_changed()?;
        Ok(number)
    }

    /// Delete the selected tool; its number becomes free again.
    pub fn delete_selected(&mut self) -> Result<ToolRecord> {
        let number = self.require_selection("delete")?;
        let removed = self
            .inventory
            .remove(number)
            .ok_or_else(|| Error::no_selection("selected tool no longer exists"))?;
        tracing::info!("tool_deleted: number={}", number);
        self.clear();
        self.inventory_changed()?;
        Ok(removed)
    }

    /// Lend the selected tool to `borrower`.
    pub fn lend(&mut self, borrower: &str) -> Result<()> {
        let number = self.require_selection("lend")?;
        let borrower = Borrower::new(borrower)
            .map_err(|_| Error::validation("enter who is taking the tool"))?;
        self.selection.form_mut().borrower = borrower.to_string();
        self.inventory.update(number, ToolPatch::lend(borrower))?;
        tracing::info!("tool_lent: number={}", number);
        self.inventory_changed()
    }

    /// Mark the selected tool as back on the shelf.
    pub fn return_selected(&mut self) -> Result<()> {
        let number = self.require_selection("return")?;
        self.selection.form_mut().borrower.clear();
        self.inventory.update(number, ToolPatch::give_back())?;
        tracing::info!("tool_returned: number={}", number);
        self.inventory_changed()
    }

    /// Move the selected tool. Spatial locations land on the viewed page.
    pub fn relocate(&mut self, location: &str) -> Result<()> {
        let number = self.require_selection("move")?;
        let location = Location::parse(location, self.mode(), self.current_page)?;
        self.selection.form_mut().location = location.to_string();
        self.inventory.update(number, ToolPatch::relocate(location))?;
        tracing::info!("tool_relocated: number={}", number);
        self.inventory_changed()
    }

    fn inventory_changed(&mut self) -> Result<()> {
        self.events.push(SessionEvent::InventoryChanged);
        self.inventory_store.save_all(&self.inventory)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Resolve a query. A unique exact/partial hit becomes the selection;
    /// several hits (or any fuzzy hit) are offered for [`Session::pick`].
    ///
    /// Returns `Error::NotFound` when nothing matches.
    pub fn find(&mut self, query: &str) -> Result<SearchOutcome> {
        self.events.push(SessionEvent::HighlightCleared);
        let outcome = self.search.resolve(query, self.inventory.records());
        match &outcome {
            SearchOutcome::Skipped => {}
            SearchOutcome::Unique { candidate } => {
                self.select(candidate.number)?;
            }
            SearchOutcome::Ambiguous { candidates } => {
                self.drop_selection();
                self.selection.offer(candidates.clone());
                self.events.push(SessionEvent::CandidatesOffered {
                    candidates: candidates.clone(),
                });
            }
            SearchOutcome::NotFound => {
                self.drop_selection();
                tracing::info!("search_not_found: query={:?}", query.trim());
                return Err(Error::not_found(format!(
                    "no tool matches name or number '{}'",
                    query.trim()
                )));
            }
        }
        Ok(outcome)
    }

    /// Resolve a pending disambiguation by choosing one candidate.
    pub fn pick(&mut self, number: ToolNumber) -> Result<&ToolRecord> {
        if !self.selection.is_offered(number) {
            return Err(Error::validation(format!(
                "tool {} is not among the search results",
                number
            )));
        }
        self.select(number)
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// Register a location. Returns `false` for a duplicate (nothing saved).
    pub fn add_location(&mut self, name: &str) -> Result<bool> {
        let name = LocationName::new(name).map_err(Error::validation)?;
        if !self.locations.add_location(name.clone()) {
            tracing::debug!("location_exists: name={}", name);
            return Ok(false);
        }
        tracing::info!("location_added: name={}", name);
        self.locations_changed()?;
        Ok(true)
    }

    /// Images in the configured image directory.
    pub fn candidate_images(&self) -> Result<Vec<String>> {
        locations::list_candidates(&self.config.storage.image_dir)
    }

    /// Bind one of the candidate images to a location.
    pub fn link_image(&mut self, location: &str, image: &str) -> Result<()> {
        let name = LocationName::new(location).map_err(Error::validation)?;
        let candidates = self.candidate_images()?;
        self.locations.link_image(&name, image, &candidates)?;
        tracing::info!("location_image_linked: name={}, image={}", name, image);
        self.locations_changed()
    }

    pub fn image_for(&self, location: &LocationName) -> Option<&str> {
        self.locations.image_for(location)
    }

    /// Image to show for the selected tool; `None` means "no image available".
    pub fn image_for_selected(&self) -> Result<Option<String>> {
        let record = self
            .selected()
            .ok_or_else(|| Error::no_selection("select a tool to show its location"))?;
        Ok(match &record.location {
            Location::Spatial { page, .. } => Some(locations::page_image(*page)),
            Location::Named(name) => self.locations.image_for(name).map(str::to_string),
        })
    }

    fn locations_changed(&mut self) -> Result<()> {
        self.events.push(SessionEvent::LocationsChanged);
        self.location_store.save(&self.locations)
    }

    // =========================================================================
    // Pages (spatial mode)
    // =========================================================================

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> u32 {
        self.config.inventory.page_count
    }

    /// Step forward; stays put on the last page.
    pub fn next_page(&mut self) -> u32 {
        let next = self.current_page.saturating_add(1);
        if next < self.page_count() {
            self.show_page(next);
        }
        self.current_page
    }

    /// Step back; stays put on the first page.
    pub fn previous_page(&mut self) -> u32 {
        if self.current_page > 0 {
            self.show_page(self.current_page - 1);
        }
        self.current_page
    }

    fn show_page(&mut self, page: u32) {
        let page = page.min(self.page_count().saturating_sub(1));
        if page != self.current_page {
            self.current_page = page;
            self.events.push(SessionEvent::PageChanged { page });
        }
    }

    /// Markers for the page being viewed.
    pub fn markers(&self) -> Vec<Marker> {
        self.inventory.markers_on_page(self.current_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MatchKind;
    use pretty_assertions::assert_eq;

    fn session(dir: &tempfile::TempDir) -> Session {
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.image_dir = dir.path().join("images");
        Session::open(config).unwrap()
    }

    fn num(n: u32) -> ToolNumber {
        ToolNumber::new(n).unwrap()
    }

    #[test]
    fn test_add_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let n = s.add_tool("Rake", "(10, 20)").unwrap();
        assert_eq!(n, num(1));

        let reopened = session(&dir);
        assert_eq!(reopened.inventory().len(), 1);
        assert_eq!(reopened.inventory().records()[0].name.as_str(), "Rake");
    }

    #[test]
    fn test_validation_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        assert!(matches!(s.add_tool("", "(1, 2)"), Err(Error::Validation(_))));
        assert!(matches!(s.add_tool("Rake", "(1; 2)"), Err(Error::Validation(_))));
        assert!(s.inventory().is_empty());
        assert!(!dir.path().join("inventory.jsonl").exists());
    }

    #[test]
    fn test_actions_without_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.add_tool("Rake", "(1, 2)").unwrap();

        assert!(matches!(s.lend("Ana"), Err(Error::NoSelection(_))));
        assert!(matches!(s.return_selected(), Err(Error::NoSelection(_))));
        assert!(matches!(s.delete_selected(), Err(Error::NoSelection(_))));
        assert!(matches!(s.relocate("(3, 4)"), Err(Error::NoSelection(_))));
        assert!(matches!(s.image_for_selected(), Err(Error::NoSelection(_))));
    }

    #[test]
    fn test_lend_and_return_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let n = s.add_tool("Rake", "(1, 2)").unwrap();
        s.select(n).unwrap();

        assert!(matches!(s.lend("   "), Err(Error::Validation(_))));
        s.lend("Ana").unwrap();
        assert_eq!(s.selection().form().borrower, "Ana");
        assert_eq!(
            session(&dir).inventory().get(n).unwrap().borrowed_by,
            Some(Borrower::new("Ana").unwrap())
        );

        s.return_selected().unwrap();
        assert_eq!(s.selection().form().borrower, "");
        assert_eq!(session(&dir).inventory().get(n).unwrap().borrowed_by, None);
    }

    #[test]
    fn test_delete_selected_clears_selection_and_frees_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.add_tool("Rake", "(1, 2)").unwrap();
        let hoe = s.add_tool("Hoe", "(3, 4)").unwrap();
        s.select(num(1)).unwrap();
        s.drain_events();

        let removed = s.delete_selected().unwrap();
        assert_eq!(removed.name.as_str(), "Rake");
        assert_eq!(s.selection().current(), None);
        assert!(s.selection().form().is_empty());
        assert!(s.drain_events().contains(&SessionEvent::SelectionCleared));

        assert!(matches!(s.lend("Ana"), Err(Error::NoSelection(_))));
        assert_eq!(s.add_tool("Saw", "(5, 6)").unwrap(), num(1));
        assert_eq!(hoe, num(2));
    }

    #[test]
    fn test_save_form_adds_then_updates() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let form = FormFields {
            number: String::new(),
            name: "Rake".to_string(),
            location: "(1, 2)".to_string(),
            borrower: String::new(),
        };
        let n = s.save_form(&form).unwrap();
        assert_eq!(n, num(1));
        assert!(s.selection().form().is_empty());

        s.select(n).unwrap();
        let edited = FormFields {
            name: "Leaf rake".to_string(),
            ..s.selection().form().clone()
        };
        s.save_form(&edited).unwrap();
        assert_eq!(s.inventory().len(), 1);
        assert_eq!(s.inventory().get(n).unwrap().name.as_str(), "Leaf rake");
    }

    #[test]
    fn test_save_form_requested_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let form = FormFields {
            number: "12".to_string(),
            name: "Shears".to_string(),
            location: "(1, 2)".to_string(),
            borrower: String::new(),
        };
        assert_eq!(s.save_form(&form).unwrap(), num(12));
        assert!(matches!(s.save_form(&form), Err(Error::Validation(_))));

        let bad = FormFields {
            number: "twelve".to_string(),
            ..form
        };
        assert!(matches!(s.save_form(&bad), Err(Error::Validation(_))));
    }

    #[test]
    fn test_find_unique_selects_and_switches_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.next_page();
        s.next_page();
        s.add_tool("Shears", "(1, 2)").unwrap();
        s.previous_page();
        s.previous_page();
        s.drain_events();

        let outcome = s.find("shears").unwrap();
        assert!(matches!(outcome, SearchOutcome::Unique { .. }));
        assert_eq!(s.selection().current(), Some(num(1)));
        assert_eq!(s.current_page(), 2);
        let events = s.drain_events();
        assert!(events.contains(&SessionEvent::PageChanged { page: 2 }));
    }

    #[test]
    fn test_find_fuzzy_requires_pick() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.add_tool("Shovel", "(1, 2)").unwrap();
        s.add_tool("Rake", "(3, 4)").unwrap();

        let outcome = s.find("shofel").unwrap();
        assert_eq!(outcome.candidates().len(), 1);
        assert_eq!(outcome.candidates()[0].kind, MatchKind::Fuzzy);
        assert_eq!(s.selection().current(), None);

        assert!(matches!(s.pick(num(2)), Err(Error::Validation(_))));
        s.pick(num(1)).unwrap();
        assert_eq!(s.selection().current(), Some(num(1)));
        assert!(s.selection().pending().is_empty());
    }

    #[test]
    fn test_ambiguous_search_drops_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let rake = s.add_tool("Rake", "(1, 1)").unwrap();
        s.add_tool("Shovel", "(2, 2)").unwrap();
        s.add_tool("Shears", "(3, 3)").unwrap();
        s.select(rake).unwrap();
        s.drain_events();

        let outcome = s.find("sh").unwrap();
        assert!(matches!(outcome, SearchOutcome::Ambiguous { .. }));
        assert!(s.selected().is_none());
        assert!(s.selection().form().is_empty());
        assert_eq!(s.selection().pending().len(), 2);
        assert!(s.drain_events().contains(&SessionEvent::SelectionCleared));

        assert!(matches!(s.delete_selected(), Err(Error::NoSelection(_))));
        assert!(matches!(s.lend("Ana"), Err(Error::NoSelection(_))));
        assert_eq!(s.inventory().len(), 3);
        assert!(s.inventory().get(rake).unwrap().borrowed_by.is_none());
    }

    #[test]
    fn test_not_found_drops_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let rake = s.add_tool("Rake", "(1, 1)").unwrap();
        s.select(rake).unwrap();

        assert!(matches!(s.find("xyz123"), Err(Error::NotFound(_))));
        assert!(s.selected().is_none());
        assert!(s.selection().form().is_empty());
    }

    #[test]
    fn test_find_not_found_and_blank() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        s.add_tool("Rake", "(1, 2)").unwrap();

        assert!(matches!(s.find("xyz123"), Err(Error::NotFound(_))));
        assert_eq!(s.find("  ").unwrap(), SearchOutcome::Skipped);
        assert_eq!(s.inventory().len(), 1);
    }

    #[test]
    fn test_relocate_uses_current_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        let n = s.add_tool("Rake", "(1, 2)").unwrap();
        s.select(n).unwrap();
        s.next_page();
        s.relocate("(7, 8)").unwrap();
        assert_eq!(
            s.inventory().get(n).unwrap().location,
            Location::Spatial { page: 1, x: 7, y: 8 }
        );
        assert_eq!(s.markers().len(), 1);
        assert_eq!(s.image_for_selected().unwrap().as_deref(), Some("workshop_1.jpg"));
    }

    #[test]
    fn test_page_navigation_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);
        assert_eq!(s.previous_page(), 0);
        assert_eq!(s.next_page(), 1);
        assert_eq!(s.next_page(), 2);
        assert_eq!(s.next_page(), 2);
    }

    #[test]
    fn test_locations_and_images() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(&dir);

        assert!(s.add_location("Shed").unwrap());
        assert!(!s.add_location("Shed").unwrap());
        assert!(matches!(
            s.link_image("Shed", "shed.jpg"),
            Err(Error::NoImagesAvailable(_))
        ));

        std::fs::create_dir(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images").join("shed.jpg"), b"x").unwrap();
        s.link_image("Shed", "shed.jpg").unwrap();

        let reopened = session(&dir);
        let shed = LocationName::new("Shed").unwrap();
        assert_eq!(reopened.image_for(&shed), Some("shed.jpg"));
    }
}
