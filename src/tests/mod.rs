mod bit_field_tests;
mod registry_tests;
mod query_tests;
mod engine_tests;

pub(crate) fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}
