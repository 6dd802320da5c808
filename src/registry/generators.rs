use uuid::Uuid;

pub const GAME_ID_LENGTH: usize = 8;

/// Trait for generating game identifiers
pub trait GameIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Short ids cut from a random UUID
pub struct ShortUuidGenerator;

impl ShortUuidGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShortUuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GameIdGenerator for ShortUuidGenerator {
    fn generate(&self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(GAME_ID_LENGTH);
        id
    }
}
