//! Mirroring of the view model into a secondary presentation surface.
//!
//! The surface is optional and may vanish at any time. A surface found closed
//! at write time is dropped quietly; the next `open` starts over.

use crate::error::SurfaceError;
use crate::view::ViewModel;

/// A secondary presentation target (floating window, status file, ...).
pub trait Surface {
    fn is_open(&self) -> bool;
    fn apply(&mut self, view: &ViewModel) -> Result<(), SurfaceError>;
    fn close(&mut self);
}

pub struct MirrorSync {
    supported: bool,
    surface: Option<Box<dyn Surface>>,
}

impl MirrorSync {
    pub fn new() -> Self {
        Self {
            supported: true,
            surface: None,
        }
    }

    /// Mirror for a platform without secondary surfaces. Every open is a no-op.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            surface: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn is_open(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.is_open())
    }

    /// Attach a surface, replacing (and closing) any previous one. Returns
    /// whether the surface was attached.
    pub fn open(&mut self, surface: Box<dyn Surface>) -> bool {
        if !self.supported {
            tracing::debug!("secondary surfaces unsupported, mirror stays off");
            return false;
        }
        self.close();
        self.surface = Some(surface);
        tracing::info!("mirror surface opened");
        true
    }

    pub fn close(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            if surface.is_open() {
                surface.close();
            }
            tracing::info!("mirror surface closed");
        }
    }

    /// Copy the view into the surface, if one is open.
    pub fn sync(&mut self, view: &ViewModel) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if !surface.is_open() {
            tracing::debug!("mirror surface went away");
            self.surface = None;
            return;
        }
        match surface.apply(view) {
            Ok(()) => {}
            Err(SurfaceError::Closed) => {
                tracing::debug!("mirror surface closed during write");
                self.surface = None;
            }
            Err(e) => tracing::warn!("mirror sync failed: {e}"),
        }
    }
}

impl Default for MirrorSync {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MirrorSync {
    fn drop(&mut self) {
        self.close();
    }
}
