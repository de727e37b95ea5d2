// Library root
// -----------
// The binary (`main.rs`) only parses the configuration and hands it to
// `batch::Uploader`; everything else lives here so it can be tested.
//
// Module responsibilities:
// - `config`: command line / environment configuration, validated once.
// - `metadata`: reading metadata documents and shaping creation payloads.
// - `api`: blocking HTTP calls against the Dataverse native API.
// - `batch`: walking the datasets folder and processing each dataset.
// - `ui`: console progress lines and the upload spinner.
// - `error`: error values returned by the per-folder operations.
pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod metadata;
pub mod ui;
