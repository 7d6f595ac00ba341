use std::{
    cell::{Cell, Ref, RefCell},
    fmt,
    rc::Rc,
};

use crate::{
    plan_update, BinderConfig, CellProvider, CellRegistry, Error, EventSource, KeyPath, ListCell,
    ListItem, ListStyle, ListSurface, ListUpdate, ObservableList, Result, RowAnimation,
    Subscription,
};


/// A row interaction: the row's object, its position, and the surface it happened on.
pub struct RowEvent<T, S> {
    pub object: T,
    pub position: usize,
    pub surface: Rc<RefCell<S>>,
}
impl<T: Clone, S> Clone for RowEvent<T, S> {
    fn clone(&self) -> Self {
        Self {
            object: self.object.clone(),
            position: self.position,
            surface: self.surface.clone(),
        }
    }
}
impl<T: fmt::Debug, S> fmt::Debug for RowEvent<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowEvent")
            .field("object", &self.object)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Keeps a [`ListSurface`] in sync with an observed list.
///
/// The first observed value reloads the surface. After that, each new value is diffed against
/// the previous snapshot and the surface receives either nothing, a full reload, or one
/// [`RowBatch`](crate::RowBatch) of deletions followed by insertions.
///
/// Observation lasts as long as the binder.
pub struct ListBinder<T: ListItem, S: ListSurface> {
    node: Rc<BinderNode<T, S>>,
    _source: Subscription,
}

impl<T: ListItem, S: ListSurface> ListBinder<T, S> {
    /// Creates a surface with `style` and binds it to the list at `key_path` on `source`.
    pub fn new<Src: ?Sized>(style: ListStyle, key_path: &KeyPath<Src, T>, source: &Src) -> Self {
        Self::builder(style).bind(key_path, source)
    }

    /// Returns a builder for configuring the binder before it starts observing.
    pub fn builder(style: ListStyle) -> ListBinderBuilder<T, S> {
        ListBinderBuilder::new(style)
    }

    pub fn key_path(&self) -> &'static str {
        self.node.key_path
    }
    pub fn surface(&self) -> Ref<'_, S> {
        self.node.surface.borrow()
    }
    pub fn surface_handle(&self) -> Rc<RefCell<S>> {
        self.node.surface.clone()
    }

    /// Returns the last observed value.
    pub fn snapshot(&self) -> Rc<[T]> {
        self.node.snapshot()
    }
    pub fn row_count(&self) -> usize {
        self.node.snapshot.borrow().as_ref().map_or(0, |s| s.len())
    }

    /// Returns the position of the first element equal to `object`.
    pub fn position_for(&self, object: &T) -> Option<usize> {
        self.node.snapshot().iter().position(|value| value == object)
    }

    /// Returns the element at `position`.
    pub fn object_for(&self, position: usize) -> Result<T> {
        self.node.object_for(position)
    }

    pub fn config(&self) -> BinderConfig {
        self.node.config.get()
    }
    pub fn set_config(&self, config: BinderConfig) {
        self.node.config.set(config);
    }
    pub fn animate_changes(&self) -> bool {
        self.config().animate_changes
    }
    pub fn set_animate_changes(&self, value: bool) {
        self.update_config(|c| c.animate_changes = value);
    }
    pub fn insert_animation(&self) -> RowAnimation {
        self.config().insert_animation
    }
    pub fn set_insert_animation(&self, value: RowAnimation) {
        self.update_config(|c| c.insert_animation = value);
    }
    pub fn delete_animation(&self) -> RowAnimation {
        self.config().delete_animation
    }
    pub fn set_delete_animation(&self, value: RowAnimation) {
        self.update_config(|c| c.delete_animation = value);
    }
    fn update_config(&self, f: impl FnOnce(&mut BinderConfig)) {
        let mut config = self.node.config.get();
        f(&mut config);
        self.node.config.set(config);
    }

    /// Uses cells of type `C` for objects of `kind`.
    pub fn register_cell<C: ListCell<T> + Default>(&self, kind: T::Kind) {
        self.node.cells.borrow_mut().register::<C>(kind);
    }
    pub fn register_cell_with<C: ListCell<T>>(
        &self,
        kind: T::Kind,
        factory: impl Fn() -> C + 'static,
    ) {
        self.node.cells.borrow_mut().register_with(kind, factory);
    }

    /// Sets the provider consulted for objects whose kind has no registered cell type.
    pub fn set_cell_provider(&self, provider: impl CellProvider<T> + 'static) {
        *self.node.provider.borrow_mut() = Some(Rc::new(provider));
    }

    /// Returns a cell bound to the object at `position`.
    ///
    /// A cell of the registered type is taken from the reuse pool or built, and its object is set.
    /// Without a registration the cell provider builds the cell.
    /// Without either, this is a configuration error.
    pub fn cell_for_row(&self, position: usize) -> Result<Box<dyn ListCell<T>>> {
        let object = self.object_for(position)?;
        let kind = object.kind();
        let cell = self.node.cells.borrow_mut().dequeue(kind);
        if let Some(mut cell) = cell {
            cell.set_object(object);
            return Ok(cell);
        }
        let provider = self.node.provider.borrow().clone();
        if let Some(provider) = provider {
            return Ok(provider.cell_for_object(&object, position));
        }
        tracing::error!(
            key_path = self.node.key_path,
            ?kind,
            position,
            "no cell registered for object kind"
        );
        Err(Error::MissingCellRegistration {
            kind: format!("{kind:?}"),
        })
    }

    /// Returns a cell that scrolled out of view to the reuse pool.
    pub fn recycle_cell(&self, cell: Box<dyn ListCell<T>>) {
        self.node.cells.borrow_mut().recycle(cell);
    }

    /// Events for rows the user selected.
    pub fn row_selected(&self) -> &EventSource<RowEvent<T, S>> {
        &self.node.row_selected
    }

    /// Events for rows whose accessory the user tapped.
    pub fn accessory_tapped(&self) -> &EventSource<RowEvent<T, S>> {
        &self.node.accessory_tapped
    }

    /// Reports that the row at `position` was selected.
    pub fn select_row(&self, position: usize) -> Result<()> {
        self.node.emit(&self.node.row_selected, position)
    }

    /// Reports that the accessory of the row at `position` was tapped.
    pub fn tap_accessory(&self, position: usize) -> Result<()> {
        self.node.emit(&self.node.accessory_tapped, position)
    }
}
impl<T: ListItem + fmt::Debug, S: ListSurface> fmt::Debug for ListBinder<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBinder")
            .field("key_path", &self.node.key_path)
            .field("snapshot", &self.node.snapshot.borrow())
            .field("config", &self.node.config.get())
            .finish_non_exhaustive()
    }
}

/// Configures a [`ListBinder`] before it starts observing.
///
/// This is the unbound state of a binder. Binding consumes the builder.
pub struct ListBinderBuilder<T: ListItem, S: ListSurface> {
    surface: S,
    config: BinderConfig,
    cells: CellRegistry<T>,
    provider: Option<Rc<dyn CellProvider<T>>>,
}
impl<T: ListItem, S: ListSurface> ListBinderBuilder<T, S> {
    pub fn new(style: ListStyle) -> Self {
        Self {
            surface: S::with_style(style),
            config: BinderConfig::default(),
            cells: CellRegistry::new(),
            provider: None,
        }
    }
    pub fn config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }
    pub fn animate_changes(mut self, value: bool) -> Self {
        self.config.animate_changes = value;
        self
    }
    pub fn insert_animation(mut self, value: RowAnimation) -> Self {
        self.config.insert_animation = value;
        self
    }
    pub fn delete_animation(mut self, value: RowAnimation) -> Self {
        self.config.delete_animation = value;
        self
    }
    pub fn register_cell<C: ListCell<T> + Default>(mut self, kind: T::Kind) -> Self {
        self.cells.register::<C>(kind);
        self
    }
    pub fn register_cell_with<C: ListCell<T>>(
        mut self,
        kind: T::Kind,
        factory: impl Fn() -> C + 'static,
    ) -> Self {
        self.cells.register_with(kind, factory);
        self
    }
    pub fn cell_provider(mut self, provider: impl CellProvider<T> + 'static) -> Self {
        self.provider = Some(Rc::new(provider));
        self
    }

    /// Starts observing the list at `key_path` on `source`.
    pub fn bind<Src: ?Sized>(self, key_path: &KeyPath<Src, T>, source: &Src) -> ListBinder<T, S> {
        self.bind_observable(key_path.name(), key_path.resolve(source))
    }

    /// Starts observing `source`, using `name` in log output.
    ///
    /// The current value of `source` is observed immediately and reloads the surface.
    pub fn bind_observable(
        self,
        name: &'static str,
        source: &dyn ObservableList<T>,
    ) -> ListBinder<T, S> {
        let node = Rc::new(BinderNode {
            key_path: name,
            surface: Rc::new(RefCell::new(self.surface)),
            snapshot: RefCell::new(None),
            config: Cell::new(self.config),
            cells: RefCell::new(self.cells),
            provider: RefCell::new(self.provider),
            row_selected: EventSource::new(),
            accessory_tapped: EventSource::new(),
        });
        node.receive(&source.snapshot());
        let weak = Rc::downgrade(&node);
        let subscription = source.observe(Box::new(move |value| {
            if let Some(node) = weak.upgrade() {
                node.receive(value);
            }
        }));
        ListBinder {
            node,
            _source: subscription,
        }
    }
}

struct BinderNode<T: ListItem, S: ListSurface> {
    key_path: &'static str,
    surface: Rc<RefCell<S>>,
    snapshot: RefCell<Option<Rc<[T]>>>,
    config: Cell<BinderConfig>,
    cells: RefCell<CellRegistry<T>>,
    provider: RefCell<Option<Rc<dyn CellProvider<T>>>>,
    row_selected: EventSource<RowEvent<T, S>>,
    accessory_tapped: EventSource<RowEvent<T, S>>,
}
impl<T: ListItem, S: ListSurface> BinderNode<T, S> {
    fn snapshot(&self) -> Rc<[T]> {
        self.snapshot.borrow().clone().unwrap_or_else(|| Rc::from(Vec::new()))
    }
    fn object_for(&self, position: usize) -> Result<T> {
        let snapshot = self.snapshot();
        snapshot
            .get(position)
            .cloned()
            .ok_or(Error::PositionOutOfRange {
                position,
                len: snapshot.len(),
            })
    }

    fn receive(&self, value: &Rc<[T]>) {
        let old = self.snapshot.borrow().clone();
        let update = plan_update(old.as_deref(), &value[..], &self.config.get());
        match &update {
            ListUpdate::None => {
                tracing::trace!(key_path = self.key_path, "no visible change");
            }
            ListUpdate::Reload => {
                tracing::trace!(key_path = self.key_path, rows = value.len(), "reloading list");
                self.surface.borrow_mut().reload_data(value.len());
            }
            ListUpdate::Batch(batch) => {
                tracing::debug!(
                    key_path = self.key_path,
                    deleted = batch.deletions.len(),
                    inserted = batch.insertions.len(),
                    "animating list changes"
                );
                self.surface.borrow_mut().apply_batch(batch);
            }
        }
        *self.snapshot.borrow_mut() = Some(value.clone());
    }

    fn emit(&self, source: &EventSource<RowEvent<T, S>>, position: usize) -> Result<()> {
        let object = self.object_for(position)?;
        source.emit(&RowEvent {
            object,
            position,
            surface: self.surface.clone(),
        });
        Ok(())
    }
}
