// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod countries;
pub mod db;
pub mod models;
pub mod rates;
pub mod schedule;
pub mod selection;
pub mod store;
pub mod utils;
pub mod commands;
