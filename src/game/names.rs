use async_trait::async_trait;

/// Supplies a player name when the player starts a game without typing one.
#[async_trait]
pub trait PlayerNameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based player names, e.g. "happy-otter"
pub struct PetNameGenerator;

impl PetNameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerNameGenerator for PetNameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}

/// Always returns the same name. Handy for tests and kiosk setups.
pub struct FixedNameGenerator(pub String);

#[async_trait]
impl PlayerNameGenerator for FixedNameGenerator {
    async fn generate(&self) -> String {
        self.0.clone()
    }
}
