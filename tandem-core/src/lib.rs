//! Tandem Core
//!
//! Core types and abstractions for driving a remote proving service.
//!
//! This crate contains:
//! - Domain types: jobs, their observed status, the polling policy and the
//!   final proof record
//! - DTOs: wire shapes exchanged with the remote service

pub mod domain;
pub mod dto;
