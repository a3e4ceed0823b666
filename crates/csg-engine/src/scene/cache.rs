use anyhow::Result;

use crate::csg::Primitive;

use super::{SceneBuilder, SceneError};

/// Owned, ordered primitive sequence for the current scene.
///
/// The sequence is only ever replaced wholesale through [`rebuild`](Self::rebuild).
/// Every primitive held here has live device resources; they are released when
/// the primitive leaves the cache (next rebuild, [`shutdown`](Self::shutdown) or
/// drop of the cache).
#[derive(Default)]
pub struct SceneCache {
    primitives: Vec<Box<dyn Primitive>>,

    /// Set when the last builder failed part way through.
    partial: bool,

    /// Number of rebuilds attempted, successful or not.
    generation: u64,

    shut_down: bool,
}

impl SceneCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scene.
    ///
    /// Order of work:
    /// 1. release every held primitive
    /// 2. run `builder` on an empty sequence
    /// 3. install whatever the builder appended
    ///
    /// If `builder` fails, the primitives it appended before failing are still
    /// installed (and flagged by [`is_partial`](Self::is_partial)) so that the
    /// next rebuild or shutdown releases them. The builder's error is returned.
    pub fn rebuild<F>(&mut self, builder: F) -> Result<()>
    where
        F: FnOnce(&mut SceneBuilder<'_>) -> Result<()>,
    {
        if self.shut_down {
            return Err(SceneError::ShutDown.into());
        }

        let released = self.release_all();

        let mut built: Vec<Box<dyn Primitive>> = Vec::new();
        let result = builder(&mut SceneBuilder::new(&mut built));

        let count = built.len();
        self.primitives = built;
        self.generation += 1;
        self.partial = result.is_err();

        match result {
            Ok(()) => {
                log::debug!(
                    "scene rebuilt (generation {}): released {released}, installed {count}",
                    self.generation
                );
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "scene rebuild failed after {count} primitive(s) (generation {}): {err:#}",
                    self.generation
                );
                Err(err.context(format!("scene rebuild failed after {count} primitive(s)")))
            }
        }
    }

    /// Current sequence, in the order the builder appended it.
    #[inline]
    pub fn primitives(&self) -> &[Box<dyn Primitive>] {
        &self.primitives
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Whether the current sequence came from a builder that failed.
    #[inline]
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Releases every primitive and refuses further rebuilds.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        let released = self.release_all();
        self.partial = false;
        self.shut_down = true;
        log::debug!("scene cache shut down: released {released}");
    }

    fn release_all(&mut self) -> usize {
        let n = self.primitives.len();
        // Dropping a primitive releases its resources.
        self.primitives.clear();
        n
    }
}

impl Drop for SceneCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SceneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneCache")
            .field("primitives", &self.primitives)
            .field("partial", &self.partial)
            .field("generation", &self.generation)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}
