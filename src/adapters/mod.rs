// Adapters layer: concrete implementations of the domain ports (odoo, snapshot files, time, storage, actions).

pub mod odoo;
pub mod snapshot;
pub mod storage;
pub mod time;
pub mod web_action;
