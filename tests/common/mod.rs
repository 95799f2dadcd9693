// Common test utilities and fixtures

pub mod fixtures;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::ProjectFixture;
#[allow(unused_imports)]
pub use helpers::{
    call_tool, create_test_dispatcher, create_test_handlers, create_test_services, error_code,
    first_text, test_config,
};
