//! Entity structs for the Scry domain objects.
//!
//! A digest maps to one row or document in the active cache backend; paper
//! metadata and citation edges map to tables in the libSQL store.

mod citation;
mod digest;
mod paper;

pub use citation::CitationEdge;
pub use digest::{Digest, LabeledCluster, NewDigest, TopPaper};
pub use paper::{PaperMeta, PaperRef};
