// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod subs;
pub mod summary;
pub mod settings;
pub mod fx;
pub mod backup;
pub mod remind;
pub mod doctor;
