// crates/worldmap-core/src/emitter.rs
use crate::model::RegionSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }
}

type Listener = Box<dyn FnMut(&RegionSelection)>;

/// Broadcasts each selection synchronously to the listeners attached at that
/// moment. Nothing is buffered: a listener attached after an emission never
/// sees it.
#[derive(Default)]
pub struct SelectionEmitter {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for SelectionEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&RegionSelection) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not attached.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Delivers `selection` to every listener; returns how many received it.
    pub fn emit(&mut self, selection: &RegionSelection) -> usize {
        log::debug!("selected {} ({})", selection.name, selection.code);
        for (_, listener) in self.listeners.iter_mut() {
            listener(selection);
        }
        self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
