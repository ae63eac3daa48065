// handlers/protected/chart/mod.rs - Production chart endpoints
//
// Every route here sits behind the production-source check and a role gate
// (see app::chart_routes for the allow-list of each route).

pub mod machine;
pub mod manager;
pub mod params;
pub mod process;

pub use machine::{machine_detail, machine_list};
pub use manager::manager_overview;
pub use process::process_view;
