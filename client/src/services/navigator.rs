//! Sub-location navigation for one warehouse view
//!
//! Every navigation produces a [`LevelRequest`] tagged with its target and a
//! generation number. Executing it touches only the API; applying the outcome
//! is a separate, synchronous step that drops responses for a level the user
//! already left, or that are older than what is on screen.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    normalize_sub_location_name, sort_nodes, ChildFilter, ChildOrder, NavigationState,
    NewSubLocation, NodeRef, RawStockRecord, RenameSubLocation, StockGrouping, SubLocation,
    SubLocationId, SubLocationTree, WarehouseId,
};

use crate::error::{ClientError, ClientResult, ErrorDetail, MutationKind, ViewError};
use crate::external::{InventoryApi, SubLocationQuery};

/// Fetch of one level's children and stock, not yet executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRequest {
    pub warehouse_id: WarehouseId,
    pub target: NodeRef,
    pub generation: u64,
    pub include_inactive: bool,
}

impl LevelRequest {
    /// Fetch children and stock concurrently
    pub async fn execute<A: InventoryApi + ?Sized>(self, api: &A) -> LevelOutcome {
        let query = SubLocationQuery::level(self.warehouse_id, self.target, self.include_inactive);
        let (children, stock) = tokio::join!(
            api.list_sub_locations(&query),
            api.warehouse_stock(self.warehouse_id, self.target)
        );

        let result = match (children, stock) {
            (Ok(children), Ok(stock)) => Ok(LevelData { children, stock }),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        LevelOutcome {
            request: self,
            result,
        }
    }
}

/// Raw data of one level
#[derive(Debug, Clone)]
pub struct LevelData {
    pub children: Vec<SubLocation>,
    pub stock: Vec<RawStockRecord>,
}

/// An executed [`LevelRequest`]
#[derive(Debug)]
pub struct LevelOutcome {
    pub request: LevelRequest,
    pub result: ClientResult<LevelData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The response was for a level no longer shown, or older than the shown data
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MutationOp {
    Create(NewSubLocation),
    Rename(SubLocationId, RenameSubLocation),
    ToggleActive(SubLocationId),
}

/// A create/rename/toggle captured with the level it was issued from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    level: NodeRef,
    op: MutationOp,
}

impl PendingMutation {
    pub fn kind(&self) -> MutationKind {
        match self.op {
            MutationOp::Create(_) => MutationKind::Create,
            MutationOp::Rename(..) => MutationKind::Rename,
            MutationOp::ToggleActive(_) => MutationKind::ToggleActive,
        }
    }

    pub fn level(&self) -> NodeRef {
        self.level
    }

    pub async fn execute<A: InventoryApi + ?Sized>(self, api: &A) -> MutationOutcome {
        let result = match &self.op {
            MutationOp::Create(body) => api.create_sub_location(body).await,
            MutationOp::Rename(id, body) => api.rename_sub_location(*id, body).await,
            MutationOp::ToggleActive(id) => api.toggle_sub_location(*id).await,
        };
        MutationOutcome {
            mutation: self,
            result,
        }
    }
}

#[derive(Debug)]
pub struct MutationOutcome {
    pub mutation: PendingMutation,
    pub result: ClientResult<SubLocation>,
}

/// A successful mutation, with the refetch to run if the user stayed put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationCompletion {
    pub node: SubLocation,
    pub refetch: Option<LevelRequest>,
}

/// Everything a view renders for the current level
#[derive(Debug, Clone, Serialize)]
pub struct LevelView {
    pub warehouse_id: WarehouseId,
    pub current: NodeRef,
    pub breadcrumbs: Vec<SubLocation>,
    pub children: Vec<SubLocation>,
    pub stock: StockGrouping,
    pub total_quantity: Decimal,
    pub loading: bool,
    pub error: Option<ErrorDetail>,
}

/// Navigation state machine for one warehouse
pub struct Navigator<A: InventoryApi + ?Sized> {
    api: Arc<A>,
    warehouse_id: WarehouseId,
    include_inactive: bool,
    state: NavigationState,
    tree: SubLocationTree,
    children: Vec<SubLocation>,
    stock: StockGrouping,
    issued: u64,
    settled: u64,
    last_error: Option<ErrorDetail>,
}

impl<A: InventoryApi + ?Sized> Navigator<A> {
    /// Navigator at the warehouse root with nothing loaded yet
    pub fn new(api: Arc<A>, warehouse_id: WarehouseId) -> Self {
        Self {
            api,
            warehouse_id,
            include_inactive: false,
            state: NavigationState::root(),
            tree: SubLocationTree::new(warehouse_id),
            children: Vec::new(),
            stock: StockGrouping::default(),
            issued: 0,
            settled: 0,
            last_error: None,
        }
    }

    pub fn with_include_inactive(mut self, include_inactive: bool) -> Self {
        self.include_inactive = include_inactive;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current(&self) -> NodeRef {
        self.state.current()
    }

    pub fn breadcrumbs(&self) -> &[SubLocation] {
        self.state.breadcrumbs()
    }

    pub fn children(&self) -> &[SubLocation] {
        &self.children
    }

    pub fn stock(&self) -> &StockGrouping {
        &self.stock
    }

    pub fn tree(&self) -> &SubLocationTree {
        &self.tree
    }

    pub fn include_inactive(&self) -> bool {
        self.include_inactive
    }

    /// Whether the newest request for this level has not been applied yet
    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    pub fn last_error(&self) -> Option<&ErrorDetail> {
        self.last_error.as_ref()
    }

    /// Path label of the current level, `None` at the root
    pub fn current_label(&self) -> Option<String> {
        self.state
            .current_node()
            .map(|node| self.tree.display_path(node))
    }

    pub fn snapshot(&self) -> LevelView {
        LevelView {
            warehouse_id: self.warehouse_id,
            current: self.current(),
            breadcrumbs: self.breadcrumbs().to_vec(),
            children: self.children.clone(),
            stock: self.stock.clone(),
            total_quantity: self.stock.total_quantity(),
            loading: self.is_loading(),
            error: self.last_error.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn navigate_to_root(&mut self) -> LevelRequest {
        self.enter(self.state.to_root())
    }

    /// Move to `node`.
    ///
    /// A child of the current level is appended to the breadcrumbs and a node
    /// already on them truncates the trail. Any other node gets its trail
    /// rebuilt from the known hierarchy.
    pub fn navigate_to_child(&mut self, node: SubLocation) -> Result<LevelRequest, ViewError> {
        if node.warehouse_id != self.warehouse_id {
            return Err(self.surface(ViewError::ForeignSubLocation {
                node: node.id,
                warehouse: self.warehouse_id,
            }));
        }
        self.tree.upsert(node.clone());

        let on_trail = self.state.breadcrumbs().iter().any(|n| n.id == node.id);
        let next = if on_trail || node.parent == self.state.current().id() {
            self.state.to_node(node)
        } else {
            NavigationState::from_path(self.trail_to(&node))
        };
        Ok(self.enter(next))
    }

    /// Jump back to the breadcrumb at `index`; `None` if there is no such crumb
    pub fn navigate_to_breadcrumb(&mut self, index: usize) -> Option<LevelRequest> {
        let node = self.state.breadcrumbs().get(index)?.clone();
        Some(self.enter(self.state.to_node(node)))
    }

    /// Refetch the current level
    pub fn refresh_request(&mut self) -> LevelRequest {
        self.issue()
    }

    /// Change the inactive filter and refetch the current level
    pub fn set_include_inactive(&mut self, include_inactive: bool) -> LevelRequest {
        self.include_inactive = include_inactive;
        self.children = self.cached_children(self.current());
        self.issue()
    }

    /// Apply an executed request if it still describes what is on screen
    pub fn apply(&mut self, outcome: LevelOutcome) -> Result<ApplyOutcome, ViewError> {
        let request = outcome.request;
        if !self.is_current(&request) {
            tracing::warn!(
                warehouse_id = %request.warehouse_id,
                level = %request.target,
                generation = request.generation,
                current = %self.current(),
                "Discarding stale level response"
            );
            return Ok(ApplyOutcome::Discarded);
        }
        self.settled = request.generation;

        let data = match outcome.result {
            Ok(data) => data,
            Err(source) => {
                return Err(self.surface(ViewError::FetchFailure {
                    target: request.target,
                    source,
                }))
            }
        };

        let mut children: Vec<SubLocation> = data
            .children
            .into_iter()
            .filter(|n| n.warehouse_id == self.warehouse_id)
            .collect();
        self.tree.extend(children.iter().cloned());
        sort_nodes(&mut children, ChildOrder::default());
        self.children = children;

        match StockGrouping::from_raw(data.stock, request.target, Some(&self.tree)) {
            Ok(grouping) => {
                tracing::debug!(
                    level = %request.target,
                    generation = request.generation,
                    children = self.children.len(),
                    groups = grouping.groups.len(),
                    "Applied level"
                );
                self.stock = grouping;
                self.last_error = None;
                Ok(ApplyOutcome::Applied)
            }
            Err(err) => {
                self.stock = StockGrouping {
                    viewed: request.target,
                    ..StockGrouping::default()
                };
                Err(self.surface(ViewError::from(err)))
            }
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a child of the current level
    pub fn prepare_create(&mut self, name: &str) -> Result<PendingMutation, ViewError> {
        let name = self.checked_name(MutationKind::Create, name)?;
        let body = NewSubLocation::new(self.warehouse_id, self.current().id(), &name);
        Ok(self.pending(MutationOp::Create(body)))
    }

    pub fn prepare_rename(&mut self, id: SubLocationId, name: &str) -> Result<PendingMutation, ViewError> {
        let name = self.checked_name(MutationKind::Rename, name)?;
        Ok(self.pending(MutationOp::Rename(id, RenameSubLocation::new(&name))))
    }

    pub fn prepare_toggle(&self, id: SubLocationId) -> PendingMutation {
        self.pending(MutationOp::ToggleActive(id))
    }

    /// Record a finished mutation.
    ///
    /// The returned node replaces the known copy (tree, breadcrumbs, listing).
    /// A refetch is only requested when the user is still on the level the
    /// mutation was issued from.
    pub fn complete(&mut self, outcome: MutationOutcome) -> Result<MutationCompletion, ViewError> {
        let kind = outcome.mutation.kind();
        let level = outcome.mutation.level;

        let node = match outcome.result {
            Ok(node) => node,
            Err(source) => return Err(self.surface(ViewError::MutationFailure { kind, source })),
        };

        if node.warehouse_id == self.warehouse_id {
            self.tree.upsert(node.clone());
            self.state = self.state.refreshed(&node);
            if let Some(listed) = self.children.iter_mut().find(|n| n.id == node.id) {
                *listed = node.clone();
            }
        }

        let refetch = if level == self.current() {
            Some(self.issue())
        } else {
            tracing::debug!(%kind, %level, current = %self.current(), "Skipping refetch of a level no longer shown");
            None
        };
        Ok(MutationCompletion { node, refetch })
    }

    // ------------------------------------------------------------------
    // Single-task conveniences
    // ------------------------------------------------------------------

    /// Load the warehouse hierarchy and show its root level
    pub async fn mount(&mut self) -> Result<ApplyOutcome, ViewError> {
        let query = SubLocationQuery::hierarchy(self.warehouse_id);
        match self.api.list_sub_locations(&query).await {
            Ok(nodes) => {
                tracing::debug!(warehouse_id = %self.warehouse_id, nodes = nodes.len(), "Loaded hierarchy");
                self.tree = SubLocationTree::from_nodes(self.warehouse_id, nodes);
            }
            Err(source) => {
                return Err(self.surface(ViewError::FetchFailure {
                    target: NodeRef::Root,
                    source,
                }))
            }
        }
        self.go_to_root().await
    }

    pub async fn go_to_root(&mut self) -> Result<ApplyOutcome, ViewError> {
        let request = self.navigate_to_root();
        self.run(request).await
    }

    pub async fn go_to_child(&mut self, node: SubLocation) -> Result<ApplyOutcome, ViewError> {
        let request = self.navigate_to_child(node)?;
        self.run(request).await
    }

    /// Navigate to a known node by id
    pub async fn go_to(&mut self, id: SubLocationId) -> Result<ApplyOutcome, ViewError> {
        let node = match self.tree.get(id) {
            Some(node) => node.clone(),
            None => {
                return Err(self.surface(ViewError::FetchFailure {
                    target: NodeRef::Node(id),
                    source: ClientError::NotFound(format!("sub-location {}", id)),
                }))
            }
        };
        self.go_to_child(node).await
    }

    pub async fn go_to_breadcrumb(&mut self, index: usize) -> Result<ApplyOutcome, ViewError> {
        match self.navigate_to_breadcrumb(index) {
            Some(request) => self.run(request).await,
            None => Ok(ApplyOutcome::Discarded),
        }
    }

    pub async fn refresh(&mut self) -> Result<ApplyOutcome, ViewError> {
        let request = self.refresh_request();
        self.run(request).await
    }

    pub async fn create_child(&mut self, name: &str) -> Result<SubLocation, ViewError> {
        let mutation = self.prepare_create(name)?;
        self.run_mutation(mutation).await
    }

    pub async fn rename_node(&mut self, id: SubLocationId, name: &str) -> Result<SubLocation, ViewError> {
        let mutation = self.prepare_rename(id, name)?;
        self.run_mutation(mutation).await
    }

    pub async fn toggle_active(&mut self, id: SubLocationId) -> Result<SubLocation, ViewError> {
        let mutation = self.prepare_toggle(id);
        self.run_mutation(mutation).await
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn run(&mut self, request: LevelRequest) -> Result<ApplyOutcome, ViewError> {
        let api = Arc::clone(&self.api);
        let outcome = request.execute(api.as_ref()).await;
        self.apply(outcome)
    }

    async fn run_mutation(&mut self, mutation: PendingMutation) -> Result<SubLocation, ViewError> {
        let api = Arc::clone(&self.api);
        let outcome = mutation.execute(api.as_ref()).await;
        let completion = self.complete(outcome)?;
        if let Some(request) = completion.refetch {
            self.run(request).await?;
        }
        Ok(completion.node)
    }

    /// Switch to `next` and issue the fetch for it
    fn enter(&mut self, next: NavigationState) -> LevelRequest {
        tracing::debug!(from = %self.current(), to = %next.current(), depth = next.depth(), "Navigating");
        self.state = next;
        let target = self.current();
        self.children = self.cached_children(target);
        self.stock = StockGrouping {
            viewed: target,
            ..StockGrouping::default()
        };
        self.issue()
    }

    fn issue(&mut self) -> LevelRequest {
        self.issued += 1;
        LevelRequest {
            warehouse_id: self.warehouse_id,
            target: self.current(),
            generation: self.issued,
            include_inactive: self.include_inactive,
        }
    }

    fn is_current(&self, request: &LevelRequest) -> bool {
        request.warehouse_id == self.warehouse_id
            && request.target == self.current()
            && request.generation >= self.settled
    }

    /// Known children of `target` shown while its fetch is pending
    fn cached_children(&self, target: NodeRef) -> Vec<SubLocation> {
        let filter = ChildFilter {
            include_inactive: self.include_inactive,
            ..ChildFilter::default()
        };
        self.tree
            .children_with(target, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Root-to-node trail from the known hierarchy
    fn trail_to(&self, node: &SubLocation) -> Vec<SubLocation> {
        match self.tree.path_nodes(node.id) {
            Ok(path) if !path.is_empty() => path.into_iter().cloned().collect(),
            Ok(_) => vec![node.clone()],
            Err(err) => {
                tracing::warn!(warehouse_id = %self.warehouse_id, "{}; treating node as top-level", err);
                vec![node.clone()]
            }
        }
    }

    fn checked_name(&mut self, kind: MutationKind, name: &str) -> Result<String, ViewError> {
        normalize_sub_location_name(name).map_err(|message| {
            self.surface(ViewError::MutationFailure {
                kind,
                source: ClientError::Validation(message.to_string()),
            })
        })
    }

    fn pending(&self, op: MutationOp) -> PendingMutation {
        PendingMutation {
            level: self.current(),
            op,
        }
    }

    /// Log a view error and keep its detail for rendering
    fn surface(&mut self, error: ViewError) -> ViewError {
        let detail = error.detail();
        tracing::error!(code = %detail.code, current = %self.current(), "{}", error);
        self.last_error = Some(detail);
        error
    }
}
