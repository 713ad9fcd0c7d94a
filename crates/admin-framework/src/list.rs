//! # Paginated List Controller
//!
//! A [`ListController`] owns the [`ListQuery`] for one table, the last page it
//! rendered, the row selection, and the fetches it has in flight.
//!
//! Every query change issues exactly one fetch and bumps a generation counter.
//! A completion whose generation is not the latest one is dropped, so the
//! rendered page always belongs to the newest query that has returned.
//! A failed fetch is recorded in `last_error` and leaves the previous page
//! where it was. A page past the end, as left behind by a delete on the last
//! page, is clamped to the last page that exists and fetched again.
//!
//! Forms opened from the list report back over a channel; a saved form
//! refreshes the current page without touching search or ordering.

use crate::bulk_delete::{BulkDelete, BulkDeleteReport};
use crate::config::UiConfig;
use crate::entity::ResourceEntity;
use crate::error::{AdminError, ClientError, Failure, Operation};
use crate::form::{CompletionSender, FormController, FormOutcome, FormSchema};
use crate::query::{ListQuery, Ordering, Page};
use crate::remote::RemoteResource;
use crate::selection::SelectionSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, info, warn};

/// A table column. Columns with a `sort_field` can be clicked to sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub sort_field: Option<String>,
}

impl Column {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sort_field: None,
        }
    }

    pub fn sortable(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sort_field: Some(field.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Opens the edit form for the row.
    Edit,
    /// Opens the object permission editor for `model`.
    Permissions { model: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Actions(Vec<RowAction>),
}

/// Static description of a list page and its row projection.
///
/// `row` must be pure: same item, same cells.
pub trait ListView: Send + Sync + 'static {
    type Item: ResourceEntity;

    fn title(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn icon(&self) -> &str {
        ""
    }

    fn search_enabled(&self) -> bool {
        true
    }

    fn default_ordering(&self) -> Ordering {
        Ordering::parse(<Self::Item as ResourceEntity>::DEFAULT_ORDERING)
    }

    fn columns(&self) -> Vec<Column>;

    fn row(&self, item: &Self::Item) -> Vec<Cell>;
}

type ItemId<V> = <<V as ListView>::Item as ResourceEntity>::Id;

struct FetchCompletion<T> {
    generation: u64,
    result: Result<Page<T>, ClientError>,
}

enum Wake<T, Id> {
    Fetched(Result<(task::Id, FetchCompletion<T>), JoinError>),
    Form(FormOutcome<Id>),
}

/// What [`ListController::next_event`] applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<Id> {
    Refreshed { generation: u64, count: usize },
    /// A superseded fetch returned and was ignored.
    StaleDiscarded { generation: u64 },
    RefreshFailed(Failure),
    /// The requested page was past the end; `refresh` fetches page `to`.
    PageClamped { from: u32, to: u32, refresh: u64 },
    /// A child form saved; `refresh` is the generation of the fetch it issued.
    FormSaved { id: Id, refresh: u64 },
    FormCancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowRender<Id> {
    pub id: Id,
    pub selected: bool,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRender<Id> {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub columns: Vec<Column>,
    pub rows: Vec<RowRender<Id>>,
    /// `None` when the page has no search box.
    pub search: Option<String>,
    pub ordering: Option<Ordering>,
    pub page_number: u32,
    pub page_count: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_count: usize,
    pub delete_enabled: bool,
}

pub struct ListController<V: ListView, C: RemoteResource<V::Item>> {
    view: V,
    client: C,
    query: ListQuery,
    page: Option<Page<V::Item>>,
    selection: SelectionSet<ItemId<V>>,
    issued: u64,
    settled: u64,
    in_flight: JoinSet<FetchCompletion<V::Item>>,
    generations: HashMap<task::Id, u64>,
    forms_tx: CompletionSender<ItemId<V>>,
    forms_rx: mpsc::UnboundedReceiver<FormOutcome<ItemId<V>>>,
    last_error: Option<Failure>,
}

impl<V: ListView, C: RemoteResource<V::Item>> ListController<V, C> {
    /// Builds the controller. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(view: V, client: C, config: &UiConfig) -> Self {
        let query =
            ListQuery::new(config.pagination.per_page).with_ordering(view.default_ordering());
        let (forms_tx, forms_rx) = mpsc::unbounded_channel();
        Self {
            view,
            client,
            query,
            page: None,
            selection: SelectionSet::new(),
            issued: 0,
            settled: 0,
            in_flight: JoinSet::new(),
            generations: HashMap::new(),
            forms_tx,
            forms_rx,
            last_error: None,
        }
    }

    /// Starts with `search` already applied.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.query.search = search.into();
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn page(&self) -> Option<&Page<V::Item>> {
        self.page.as_ref()
    }

    pub fn selection(&self) -> &SelectionSet<ItemId<V>> {
        &self.selection
    }

    pub fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    /// Whether the latest issued fetch has not come back yet.
    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    fn issue(&mut self) -> u64 {
        self.issued += 1;
        let generation = self.issued;
        let query = self.query.clone();
        let client = self.client.clone();
        debug!(
            kind = <V::Item as ResourceEntity>::KIND,
            generation,
            page = query.page,
            search = %query.search,
            "Fetching page"
        );
        let handle = self.in_flight.spawn(async move {
            FetchCompletion {
                generation,
                result: client.list(query).await,
            }
        });
        self.generations.insert(handle.id(), generation);
        generation
    }

    /// Re-fetches the current query. Selection is kept and pruned on arrival.
    pub fn refresh(&mut self) -> u64 {
        self.issue()
    }

    /// Sets the search text, returns to page 1 and fetches.
    pub fn set_search(&mut self, text: impl Into<String>) -> u64 {
        self.query.search = text.into();
        self.query.page = 1;
        self.selection.clear();
        self.issue()
    }

    /// Sorts by `field` (`-field` for descending), returns to page 1 and fetches.
    pub fn set_ordering(&mut self, field: &str) -> u64 {
        self.query.ordering = Some(Ordering::parse(field));
        self.query.page = 1;
        self.selection.clear();
        self.issue()
    }

    /// Adds an exact-match filter, returns to page 1 and fetches.
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) -> u64 {
        let field = field.into();
        self.query.filters.retain(|(existing, _)| *existing != field);
        self.query.filters.push((field, value.into()));
        self.query.page = 1;
        self.selection.clear();
        self.issue()
    }

    pub fn set_page(&mut self, page: u32) -> u64 {
        self.query.page = page.max(1);
        self.selection.clear();
        self.issue()
    }

    /// Toggles a row on the current page. Ids not on the page are ignored.
    pub fn toggle_row(&mut self, id: &ItemId<V>) -> bool {
        let on_page = self
            .page
            .as_ref()
            .is_some_and(|page| page.items.iter().any(|item| item.pk() == id));
        if !on_page {
            return false;
        }
        self.selection.toggle(id.clone())
    }

    pub fn select_all_on_page(&mut self) {
        let ids = self
            .page
            .iter()
            .flat_map(|page| page.items.iter().map(|item| item.pk().clone()));
        self.selection.select_exactly(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected items, in page order.
    pub fn selected_items(&self) -> Vec<V::Item> {
        self.page
            .iter()
            .flat_map(|page| page.items.iter())
            .filter(|item| self.selection.contains(item.pk()))
            .cloned()
            .collect()
    }

    /// Starts a bulk delete of the selected rows.
    pub fn bulk_delete(&self) -> Result<BulkDelete<V::Item, C>, AdminError> {
        BulkDelete::new(self.client.clone(), self.selected_items())
    }

    /// Drops the deleted ids from the selection and issues one refresh.
    pub fn apply_bulk_delete(&mut self, report: &BulkDeleteReport<ItemId<V>>) -> u64 {
        info!(
            kind = <V::Item as ResourceEntity>::KIND,
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "Bulk delete finished"
        );
        self.selection.remove_all(report.succeeded.iter());
        self.issue()
    }

    /// Sender a child form reports its outcome on.
    pub fn completion_sender(&self) -> CompletionSender<ItemId<V>> {
        self.forms_tx.clone()
    }

    pub fn create_form<S>(&self, schema: Arc<S>) -> FormController<S, C>
    where
        S: FormSchema<Model = V::Item>,
        C: RemoteResource<S::Model>,
    {
        FormController::new(schema, self.client.clone(), None)
            .with_completion(self.completion_sender())
    }

    pub fn edit_form<S>(&self, schema: Arc<S>, id: ItemId<V>) -> FormController<S, C>
    where
        S: FormSchema<Model = V::Item>,
        C: RemoteResource<S::Model>,
    {
        FormController::new(schema, self.client.clone(), Some(id))
            .with_completion(self.completion_sender())
    }

    /// Waits for the next fetch or form outcome and applies it.
    ///
    /// Returns `None` when no fetch is in flight and no form has reported.
    pub async fn next_event(&mut self) -> Option<ListEvent<ItemId<V>>> {
        if let Ok(outcome) = self.forms_rx.try_recv() {
            return Some(self.apply_form(outcome));
        }
        if self.in_flight.is_empty() {
            return None;
        }
        let wake = tokio::select! {
            Some(joined) = self.in_flight.join_next_with_id() => Wake::Fetched(joined),
            Some(outcome) = self.forms_rx.recv() => Wake::Form(outcome),
        };
        Some(match wake {
            Wake::Fetched(joined) => self.apply_fetch(joined),
            Wake::Form(outcome) => self.apply_form(outcome),
        })
    }

    /// Applies every in-flight fetch, and any form outcomes they trigger.
    pub async fn settle_all(&mut self) -> Vec<ListEvent<ItemId<V>>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn apply_fetch(
        &mut self,
        joined: Result<(task::Id, FetchCompletion<V::Item>), JoinError>,
    ) -> ListEvent<ItemId<V>> {
        let kind = <V::Item as ResourceEntity>::KIND;
        let completion = match joined {
            Ok((id, completion)) => {
                self.generations.remove(&id);
                completion
            }
            Err(e) => {
                let generation = self.generations.remove(&e.id()).unwrap_or_default();
                if generation != self.issued {
                    debug!(kind, generation, latest = self.issued, "Discarding stale task failure");
                    return ListEvent::StaleDiscarded { generation };
                }
                warn!(kind, generation, error = %e, "Fetch task did not complete");
                self.settled = generation;
                let failure =
                    Failure::new(Operation::ListRefresh, AdminError::RemoteFetch(e.to_string()));
                self.last_error = Some(failure.clone());
                return ListEvent::RefreshFailed(failure);
            }
        };

        let generation = completion.generation;
        if generation != self.issued {
            debug!(kind, generation, latest = self.issued, "Discarding stale page");
            return ListEvent::StaleDiscarded { generation };
        }
        self.settled = generation;

        match completion.result {
            Ok(page) if page.items.is_empty() && self.query.page > page.page_count() => {
                let from = self.query.page;
                let to = page.page_count();
                info!(kind, generation, from, to, "Page past the end, clamping");
                self.selection.clear();
                self.page = Some(page);
                self.last_error = None;
                self.query.page = to;
                let refresh = self.issue();
                ListEvent::PageClamped { from, to, refresh }
            }
            Ok(page) => {
                self.selection
                    .retain_within(page.items.iter().map(|item| item.pk()));
                let count = page.items.len();
                info!(kind, generation, count, total = page.total_count, "Page loaded");
                self.page = Some(page);
                self.last_error = None;
                ListEvent::Refreshed { generation, count }
            }
            Err(e) => {
                warn!(kind, generation, error = %e, "Page fetch failed");
                let failure = Failure::new(Operation::ListRefresh, e);
                self.last_error = Some(failure.clone());
                ListEvent::RefreshFailed(failure)
            }
        }
    }

    fn apply_form(&mut self, outcome: FormOutcome<ItemId<V>>) -> ListEvent<ItemId<V>> {
        match outcome {
            FormOutcome::Saved(id) => {
                debug!(%id, "Form saved, refreshing");
                let refresh = self.refresh();
                ListEvent::FormSaved { id, refresh }
            }
            FormOutcome::Cancelled => ListEvent::FormCancelled,
        }
    }

    pub fn render(&self) -> TableRender<ItemId<V>> {
        let rows = self
            .page
            .iter()
            .flat_map(|page| page.items.iter())
            .map(|item| RowRender {
                id: item.pk().clone(),
                selected: self.selection.contains(item.pk()),
                cells: self.view.row(item),
            })
            .collect();
        let (page_number, page_count, total_count, has_next, has_previous) = match &self.page {
            Some(page) => (
                page.page_number,
                page.page_count(),
                page.total_count,
                page.has_next(),
                page.has_previous(),
            ),
            None => (self.query.page, 1, 0, false, false),
        };
        TableRender {
            title: self.view.title().to_string(),
            description: self.view.description().to_string(),
            icon: self.view.icon().to_string(),
            columns: self.view.columns(),
            rows,
            search: self
                .view
                .search_enabled()
                .then(|| self.query.search.clone()),
            ordering: self.query.ordering.clone(),
            page_number,
            page_count,
            total_count,
            has_next,
            has_previous,
            loading: self.is_loading(),
            error: self.last_error.as_ref().map(ToString::to_string),
            selected_count: self.selection.len(),
            delete_enabled: !self.selection.is_empty(),
        }
    }
}
