use crc32fast::Hasher;

/// Source of UI-only block IDs.
///
/// IDs are never persisted and never compared across sessions, so any
/// source that hands out distinct strings will do. Closures work too:
///
/// ```
/// use notebridge_editor::IdSource;
///
/// let mut n = 0;
/// let mut ids = move || {
///     n += 1;
///     format!("block-{}", n)
/// };
/// assert_eq!(ids.next_id(), "block-1");
/// ```
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

impl<F> IdSource for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Seed for a note's block IDs (CRC32 of the note id)
pub fn note_seed(note_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(note_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator scoped to one note
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn for_note(note_id: &str) -> Self {
        Self::from_seed(note_seed(note_id))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdSource for IdGenerator {
    fn next_id(&mut self) -> String {
        self.new_id()
    }
}
