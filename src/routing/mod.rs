pub mod fault;
pub mod router;

pub use fault::FaultPolicy;
pub use router::Router;
