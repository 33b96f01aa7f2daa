//! Named overlays: what the external controller wants drawn, and what is drawn.
//!
//! - [`OverlayContent`] is an immutable feature collection plus its [`Fingerprint`].
//! - [`DesiredOverlays`] is the controller's snapshot, split into a static and a hover group.
//! - [`Drawable`] is the materialized representation of one overlay on the map.
//! - [`OverlayReconciler`] diffs snapshots against the materialized table.

mod content;
pub use content::{Fingerprint, OverlayContent};

mod desired;
pub use desired::{DesiredOverlay, DesiredOverlays};

mod drawable;
pub use drawable::{Drawable, LayerId, PointMarker, ShapeLayer, Sublayer};

mod reconciler;
pub use reconciler::{OverlayReconciler, OverlayRecord, ReconcileReport};

mod scatter;
pub use scatter::{DEFAULT_CMAP, ScatterBuilder};
