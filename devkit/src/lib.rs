/*!
# dupscan DevKit - stubs and utilities for scanner development

Makes it possible to exercise the scanner without a live inventory API:
- Mock inventory API serving canned pages by URL
- Builders for computer entries and paginated listings
- Test harness with a throwaway output directory
*/

pub mod api_stub;
pub mod page_builder;
pub mod test_utils;

pub use api_stub::{MockInventoryApi, MockResponse};
pub use page_builder::{computer_entry, InventoryPageBuilder};
pub use test_utils::TestHarness;
