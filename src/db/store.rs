use rustc_hash::FxHashMap;

use crate::db::models::{Bundle, Pair, Token};

/// Read access to persisted entities.
///
/// Lookups return `None` for unset entities instead of failing; callers
/// branch on absence (notably the designated stablecoin pairs and the bundle).
pub trait EntityStore {
    fn load_token(&self, id: &str) -> Option<Token>;
    fn load_pair(&self, id: &str) -> Option<Pair>;
    fn load_bundle(&self) -> Option<Bundle>;
}

/// In-memory entity store keyed by lowercase identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tokens: FxHashMap<String, Token>,
    pairs: FxHashMap<String, Pair>,
    bundle: Option<Bundle>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_token(&mut self, mut token: Token) {
        token.id = token.id.to_lowercase();
        self.tokens.insert(token.id.clone(), token);
    }

    pub fn save_pair(&mut self, mut pair: Pair) {
        pair.id = pair.id.to_lowercase();
        pair.token0 = pair.token0.to_lowercase();
        pair.token1 = pair.token1.to_lowercase();
        self.pairs.insert(pair.id.clone(), pair);
    }

    pub fn save_bundle(&mut self, bundle: Bundle) {
        self.bundle = Some(bundle);
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        self.bundle.as_ref()
    }

    /// Token ids sorted ascending, for deterministic iteration.
    pub fn token_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tokens.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Pair ids sorted ascending, for deterministic iteration.
    pub fn pair_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.pairs.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl EntityStore for MemoryStore {
    fn load_token(&self, id: &str) -> Option<Token> {
        self.tokens.get(&id.to_lowercase()).cloned()
    }

    fn load_pair(&self, id: &str) -> Option<Pair> {
        self.pairs.get(&id.to_lowercase()).cloned()
    }

    fn load_bundle(&self) -> Option<Bundle> {
        self.bundle.clone()
    }
}
