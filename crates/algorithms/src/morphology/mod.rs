//! Mathematical morphology on lattice fields
//!
//! Operators work on the exact neighbor sets of the lattice, never on a
//! padded raster:
//! - **Erosion**: minimum filter (shrinks bright regions)
//! - **Dilation**: maximum filter (expands bright regions)
//! - **Opening**: erosion then dilation (removes small bright features)
//! - **Closing**: dilation then erosion (fills small dark gaps)
//! - **Open-close / close-open**: alternating compositions of the two
//! - **Threshold**: real signal to binary mask
//! - **Area opening / closing**: size filters on binary components
//! - **Label**: connected-component labeling
//! - **Reconstruction**: geodesic dilation/erosion iterated to a fixed point

mod alternating;
mod area;
mod closing;
mod dilate;
mod element;
mod erode;
mod label;
mod opening;
mod order;
mod reconstruct;
mod threshold;

pub use alternating::{close_open, open_close, CloseOpen, CloseOpenParams, OpenClose, OpenCloseParams};
pub use area::{area_closing, area_opening, AreaClosing, AreaClosingParams, AreaOpening, AreaOpeningParams};
pub use closing::{closing, Closing, ClosingParams};
pub use dilate::{dilate, dilate_with, Dilate, DilateParams};
pub use element::StructuringElement;
pub use erode::{erode, erode_with, Erode, ErodeParams};
pub use label::{connected_components, label, Label, LabelParams};
pub use opening::{opening, Opening, OpeningParams};
pub use order::Morphable;
pub use reconstruct::{
    geodesic_dilate, geodesic_erode, reconstruct_by_dilation, reconstruct_by_erosion, Reconstruct,
    ReconstructParams, ReconstructionMethod,
};
pub(crate) use reconstruct::reconstruct_by_dilation_with;
pub use threshold::{threshold, Threshold, ThresholdParams};
