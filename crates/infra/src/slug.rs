//! Random basket slugs.

use std::sync::Mutex;

use rand::Rng;

/// Length of generated slugs. 40 alphanumeric characters carry ~238 bits.
pub const SLUG_LENGTH: usize = 40;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Source of candidate slugs. Uniqueness is checked by the caller.
pub trait SlugSource: Send + Sync {
    fn generate(&self) -> String;
}

/// Cryptographically secure random alphanumeric slugs.
#[derive(Debug, Clone, Copy)]
pub struct RandomSlugs {
    length: usize,
}

impl RandomSlugs {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomSlugs {
    fn default() -> Self {
        Self::new(SLUG_LENGTH)
    }
}

impl SlugSource for RandomSlugs {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                char::from(CHARSET[idx])
            })
            .collect()
    }
}

/// Hands out a fixed sequence of slugs, then falls back to random ones.
/// Used to force collisions in tests.
#[derive(Debug, Default)]
pub struct ScriptedSlugs {
    queue: Mutex<Vec<String>>,
}

impl ScriptedSlugs {
    pub fn new<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: Vec<String> = slugs.into_iter().map(Into::into).collect();
        queue.reverse();
        Self {
            queue: Mutex::new(queue),
        }
    }
}

impl SlugSource for ScriptedSlugs {
    fn generate(&self) -> String {
        let next = self.queue.lock().ok().and_then(|mut queue| queue.pop());
        next.unwrap_or_else(|| RandomSlugs::default().generate())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn random_slugs_are_alphanumeric_and_long_enough() {
        let slug = RandomSlugs::default().generate();
        assert_eq!(slug.len(), SLUG_LENGTH);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_slugs_do_not_repeat() {
        let source = RandomSlugs::default();
        let slugs: HashSet<String> = (0..1000).map(|_| source.generate()).collect();
        assert_eq!(slugs.len(), 1000);
    }

    #[test]
    fn scripted_slugs_come_out_in_order() {
        let source = ScriptedSlugs::new(["first", "second"]);
        assert_eq!(source.generate(), "first");
        assert_eq!(source.generate(), "second");
        assert_eq!(source.generate().len(), SLUG_LENGTH);
    }
}
