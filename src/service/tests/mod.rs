mod filter_json;
mod support;
mod timer;
