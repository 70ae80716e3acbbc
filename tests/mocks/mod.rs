pub mod recording_storage;
