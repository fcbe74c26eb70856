// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::Category;

/// A well-known service that can seed a new subscription.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub category: Category,
    pub cancellation_url: &'static str,
    /// `(symbol, price in cents)`; zero means not sold in that currency.
    prices: [(&'static str, i64); 4],
}

impl Preset {
    pub fn price_in(&self, symbol: &str) -> Option<Decimal> {
        self.prices
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, cents)| Decimal::new(*cents, 2))
            .filter(|p| !p.is_zero())
    }

    pub fn prices(&self) -> impl Iterator<Item = (&'static str, Decimal)> + '_ {
        self.prices
            .iter()
            .filter(|(_, cents)| *cents > 0)
            .map(|(s, cents)| (*s, Decimal::new(*cents, 2)))
    }
}

pub static PRESETS: [Preset; 12] = [
    Preset {
        id: "netflix",
        name: "Netflix",
        color: "#E50914",
        category: Category::Entertainment,
        cancellation_url: "https://www.netflix.com/cancelplan",
        prices: [("$", 1549), ("₺", 14999), ("€", 1349), ("£", 1099)],
    },
    Preset {
        id: "spotify",
        name: "Spotify",
        color: "#1DB954",
        category: Category::Entertainment,
        cancellation_url: "https://support.spotify.com/article/cancel-premium/",
        prices: [("$", 1199), ("₺", 5999), ("€", 1099), ("£", 1099)],
    },
    Preset {
        id: "youtube",
        name: "YouTube Premium",
        color: "#FF0000",
        category: Category::Entertainment,
        cancellation_url: "https://www.youtube.com/paid_memberships?ybp=mAEK",
        prices: [("$", 1399), ("₺", 5799), ("€", 1299), ("£", 1299)],
    },
    Preset {
        id: "icloud",
        name: "iCloud+",
        color: "#007AFF",
        category: Category::Utilities,
        cancellation_url: "https://support.apple.com/HT202039",
        prices: [("$", 299), ("₺", 3999), ("€", 299), ("£", 299)],
    },
    Preset {
        id: "amazon",
        name: "Amazon Prime",
        color: "#00A8E1",
        category: Category::Personal,
        cancellation_url: "https://www.amazon.com/gp/help/customer/display.html?nodeId=GTJQ7QZY7E2647JE",
        prices: [("$", 1499), ("₺", 3900), ("€", 899), ("£", 899)],
    },
    Preset {
        id: "disney",
        name: "Disney+",
        color: "#113CCF",
        category: Category::Entertainment,
        cancellation_url: "https://help.disneyplus.com/article/disneyplus-cancel-subscription",
        prices: [("$", 1399), ("₺", 13499), ("€", 1099), ("£", 799)],
    },
    Preset {
        id: "applemusic",
        name: "Apple Music",
        color: "#FA243C",
        category: Category::Entertainment,
        cancellation_url: "https://support.apple.com/HT212047",
        prices: [("$", 1099), ("₺", 3999), ("€", 1099), ("£", 1099)],
    },
    Preset {
        id: "xbox",
        name: "Xbox Game Pass",
        color: "#107C10",
        category: Category::Entertainment,
        cancellation_url: "https://support.xbox.com/help/subscriptions-billing/manage-subscriptions/cancel-recurring-billing-or-subscription",
        prices: [("$", 1699), ("₺", 15900), ("€", 1499), ("£", 1299)],
    },
    Preset {
        id: "hbo",
        name: "HBO Max",
        color: "#5A2DA8",
        category: Category::Entertainment,
        cancellation_url: "https://help.hbomax.com/",
        prices: [("$", 1599), ("₺", 0), ("€", 999), ("£", 999)],
    },
    Preset {
        id: "hulu",
        name: "Hulu",
        color: "#1CE783",
        category: Category::Entertainment,
        cancellation_url: "https://help.hulu.com/s/article/cancel-subscription",
        prices: [("$", 1799), ("₺", 0), ("€", 0), ("£", 0)],
    },
    Preset {
        id: "playstation",
        name: "PlayStation Plus",
        color: "#00439C",
        category: Category::Entertainment,
        cancellation_url: "https://www.playstation.com/support/store/cancel-ps-store-subscription/",
        prices: [("$", 999), ("₺", 240000), ("€", 899), ("£", 699)],
    },
    Preset {
        id: "twitter",
        name: "X Premium",
        color: "#14171A",
        category: Category::Personal,
        cancellation_url: "https://help.twitter.com/en/managing-your-account/how-to-cancel-x-premium",
        prices: [("$", 800), ("₺", 15000), ("€", 960), ("£", 960)],
    },
];

pub fn preset(id: &str) -> Option<&'static Preset> {
    let id = id.trim();
    PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}
