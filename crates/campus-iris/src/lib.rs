//! # Campus Iris
//!
//! Fisher's Iris data, three small classifiers and the grids behind the
//! Iris charts: box plots, a linear decision plane in 3-D, probability
//! projections on the walls of the plot box, a non-linear SVM surface and a
//! side-by-side classifier comparison.
//!
//! Everything here is plain numbers; drawing is left to the viewer.

pub mod analysis;
pub mod classifier;
pub mod contour;
pub mod dataset;
pub mod error;
pub mod gp;
pub mod grid;
pub mod linalg;
pub mod logistic;
pub mod svm;

pub use classifier::Classifier;
pub use dataset::Dataset;
pub use error::IrisError;
pub use gp::GaussianProcessClassifier;
pub use linalg::Matrix;
pub use logistic::LogisticRegression;
pub use svm::{Gamma, Kernel, SupportVectorClassifier};
