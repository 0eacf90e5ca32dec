// Tunedeck services
// Services provide persistence and background checks: settings, updates, connectivity.

pub mod connectivity;
pub mod settings_store;
pub mod update_manager;
