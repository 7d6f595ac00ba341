use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
};


/// An element of an observed list.
///
/// Elements are compared by `Eq` and `Hash` when snapshots are diffed, and no element may
/// appear twice in one snapshot. [`kind`](Self::kind) selects the cell type used to render the
/// element.
pub trait ListItem: Clone + Eq + Hash + 'static {
    type Kind: Copy + Eq + Hash + Debug + 'static;
    fn kind(&self) -> Self::Kind;
}

/// A reusable view that renders one row.
pub trait ListCell<T>: Any {
    /// Binds the cell to the object of the row it is about to render.
    fn set_object(&mut self, object: T);
    fn object(&self) -> Option<&T>;

    /// Called before the cell goes back to the reuse pool.
    fn prepare_for_reuse(&mut self) {}
}
impl<T: 'static> dyn ListCell<T> {
    pub fn is<C: ListCell<T>>(&self) -> bool {
        (self as &dyn Any).is::<C>()
    }
    pub fn downcast_ref<C: ListCell<T>>(&self) -> Option<&C> {
        (self as &dyn Any).downcast_ref()
    }
    pub fn downcast_mut<C: ListCell<T>>(&mut self) -> Option<&mut C> {
        (self as &mut dyn Any).downcast_mut()
    }
}

/// Builds cells for objects whose kind has no registered cell type.
pub trait CellProvider<T> {
    fn cell_for_object(&self, object: &T, position: usize) -> Box<dyn ListCell<T>>;
}
impl<T, F> CellProvider<T> for F
where
    F: Fn(&T, usize) -> Box<dyn ListCell<T>>,
{
    fn cell_for_object(&self, object: &T, position: usize) -> Box<dyn ListCell<T>> {
        self(object, position)
    }
}

struct Registration<T: 'static> {
    cell_type: TypeId,
    cell_name: &'static str,
    factory: Box<dyn Fn() -> Box<dyn ListCell<T>>>,
}

/// Maps object kinds to cell types and keeps a pool of cells for reuse.
///
/// Kinds match exactly. Registering a kind again replaces the previous registration.
pub struct CellRegistry<T: ListItem> {
    registrations: HashMap<T::Kind, Registration<T>>,
    pool: HashMap<TypeId, Vec<Box<dyn ListCell<T>>>>,
}
impl<T: ListItem> CellRegistry<T> {
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            pool: HashMap::new(),
        }
    }

    pub fn register<C: ListCell<T> + Default>(&mut self, kind: T::Kind) {
        self.register_with(kind, C::default)
    }
    pub fn register_with<C: ListCell<T>>(
        &mut self,
        kind: T::Kind,
        factory: impl Fn() -> C + 'static,
    ) {
        self.registrations.insert(
            kind,
            Registration {
                cell_type: TypeId::of::<C>(),
                cell_name: type_name::<C>(),
                factory: Box::new(move || -> Box<dyn ListCell<T>> { Box::new(factory()) }),
            },
        );
        let registrations = &self.registrations;
        self.pool
            .retain(|cell_type, _| registrations.values().any(|r| r.cell_type == *cell_type));
    }
    pub fn is_registered(&self, kind: T::Kind) -> bool {
        self.registrations.contains_key(&kind)
    }

    /// Returns the type name of the cell registered for `kind`.
    pub fn cell_name(&self, kind: T::Kind) -> Option<&'static str> {
        self.registrations.get(&kind).map(|r| r.cell_name)
    }

    /// Takes a pooled cell of the type registered for `kind`, or builds a new one.
    pub fn dequeue(&mut self, kind: T::Kind) -> Option<Box<dyn ListCell<T>>> {
        let registration = self.registrations.get(&kind)?;
        let cell = self
            .pool
            .get_mut(&registration.cell_type)
            .and_then(|cells| cells.pop())
            .unwrap_or_else(|| (registration.factory)());
        Some(cell)
    }

    /// Returns a cell to the pool. Cells of a type no registration builds are dropped.
    pub fn recycle(&mut self, mut cell: Box<dyn ListCell<T>>) {
        let cell_type = (&*cell as &dyn Any).type_id();
        if !self.is_registered_type(cell_type) {
            tracing::trace!(cell_type = ?cell_type, "drop unregistered cell");
            return;
        }
        cell.prepare_for_reuse();
        self.pool.entry(cell_type).or_default().push(cell);
    }
    fn is_registered_type(&self, cell_type: TypeId) -> bool {
        self.registrations.values().any(|r| r.cell_type == cell_type)
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.values().map(|cells| cells.len()).sum()
    }
}
impl<T: ListItem> Default for CellRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
