//! CAS-authenticated web portal: ticket validation, sealed session cookies
//! and an admin-only event endpoint on PostgreSQL.

pub mod config;
pub mod cookies;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod aes;
    pub mod envelope;
    pub mod secret;
    pub mod token;
}

pub mod models {
    pub mod event;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod event;
    pub mod memory;
    pub mod session;
    pub mod store;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod cas;
    pub mod events;
}

pub mod handlers {
    pub mod auth;
    pub mod events;
    pub mod pages;
    pub mod redirect;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod csrf;
    pub mod paths;
    pub mod rate_limit;
}

pub mod validation {
    pub mod event;
}
