pub use timeout::with_timeout;

mod timeout;
