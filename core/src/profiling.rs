//! Profiling support via Tracy.
//!
//! Enabled with the `profiling` Cargo feature:
//!
//! ```bash
//! cargo run -p meshprep-app --features profiling -- scene.glb
//! ```
//!
//! The assembler opens a span per primitive and per pipeline stage, and plots
//! vertex counts before and after optimization:
//!
//! ```ignore
//! use meshprep_core::profiling::{profile_function, profile_plot, profile_scope};
//!
//! fn assemble() {
//!     profile_function!();
//!     {
//!         profile_scope!("tangents");
//!         // ...
//!     }
//!     profile_plot!("vertices_after_remap", vertex_count);
//! }
//! ```
//!
//! When the feature is off every macro compiles to nothing.

#[cfg(feature = "profiling")]
pub use tracy_client::{self, Client, plot as tracy_plot, span};

/// Start the Tracy client. Spans are only recorded once it runs.
#[cfg(feature = "profiling")]
pub fn start() {
    let _ = Client::start();
}

/// Start the Tracy client (no-op when profiling disabled).
#[cfg(not(feature = "profiling"))]
pub fn start() {}

/// Create a profiling span for the current scope.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::Client::running()
            .map(|_| $crate::profiling::span!($name));
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span covering the enclosing function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::Client::running()
            .map(|_| $crate::profiling::span!());
    };
}

/// Function span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a value over time in Tracy.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}

/// Send a message to Tracy's message log.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_message {
    ($msg:expr) => {
        if let Some(client) = $crate::profiling::Client::running() {
            client.message($msg, 0);
        }
    };
}

/// Send a message (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_message {
    ($msg:expr) => {
        let _ = $msg;
    };
}

pub use profile_function;
pub use profile_message;
pub use profile_plot;
pub use profile_scope;

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        super::start();
        profile_scope!("test_scope");
        profile_function!();
        profile_plot!("test_value", 42usize);
        profile_message!("test message");
    }
}
