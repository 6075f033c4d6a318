//! Tienda Storefront - cart and session state managers.
//!
//! This crate holds the client-side state of the storefront as two small,
//! independent managers that the UI layer composes:
//!
//! - [`services::session::SessionManager`] - the current authenticated user
//!   (or absence thereof), persisted to local storage and restored at startup
//! - [`services::cart::CartManager`] - the ordered collection of cart lines,
//!   with quantity merging, stock-ceiling enforcement, and total computation
//!
//! Both managers persist JSON snapshots through a [`storage::StorageBackend`]
//! and expose their state through `tokio::sync::watch` channels so observers
//! subscribe instead of reaching into ambient globals.
//!
//! The remote product/user store is a generic REST CRUD collaborator, reached
//! through [`remote::MockApiClient`] (or any [`remote::RemoteStore`]
//! implementation in tests).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod models;
pub mod remote;
pub mod services;
pub mod storage;
pub mod telemetry;
