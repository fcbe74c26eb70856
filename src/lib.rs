// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod backup;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod currency;
pub mod db;
pub mod models;
pub mod rates;
pub mod reminders;
pub mod store;
pub mod subscriptions;
pub mod utils;
