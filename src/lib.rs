// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod error;
pub mod fx;
pub mod http;
pub mod models;
pub mod store;
pub mod sync;
pub mod utils;
