//! The profile directory.
//!
//! The roster is a fixed, compiled-in table: profiles are not persisted and
//! cannot change at runtime. Handlers and the client read it through
//! [`roster`] instead of owning copies.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    pub id: i64,
    pub name: &'static str,
    pub username: &'static str,
    pub avatar: &'static str,
    pub bio: &'static str,
}

static PROFILES: &[Profile] = &[
    Profile {
        id: 1,
        name: "Keyboard Monkey -KBM-",
        username: "KeyboardMonkey3",
        avatar: "KeyboardMonkey3.jpg",
        bio: "🦍 multi-disciplinary degenerate. not financial advice, not real advice. advisor @evincowinerydao, @tensor_hq, co-host @rektradio_",
    },
    Profile {
        id: 2,
        name: "olimpio",
        username: "OlimpioCrypto",
        avatar: "OlimpioCrypto.png",
        bio: "Sharing cryptocurrency events, yield farming, DeFi, & airdrop strategies. Daily news: @AlphaPackedHQ. Investing: @OlimpioCapital. Finding airdrops: @earndrop_io",
    },
    Profile {
        id: 3,
        name: "Mo Shaikh 🌐 aptOS",
        username: "moshaikhs",
        avatar: "moshaikhs.jpg",
        bio: "Cofounder, CEO @aptoslabs prev. @Meta @BCG @BlackRock @ConsenSys @MeridioRE",
    },
    Profile {
        id: 4,
        name: "Ansem 🐂🀄️",
        username: "blknoiz06",
        avatar: "blknoiz06.jpg",
        bio: "coldest ni**a breathing | @BullpenFi | telegram @blknoiz06 | ig @blknoiz_06 | all other clone accounts are scams",
    },
    Profile {
        id: 5,
        name: "il Capo Of Crypto",
        username: "CryptoCapo_",
        avatar: "CryptoCapo_.jpg",
        bio: "#Crypto analyst, Swing Trader and Long-term Investor since Feb 2017 | Not financial advice | I will never DM you first. Free TG: http://t.me/CryptoCapoTG",
    },
    Profile {
        id: 6,
        name: "wallstreetbets",
        username: "wallstreetbets",
        avatar: "wallstreetbets.jpg",
        bio: "Like 4chan found a Bloomberg terminal.",
    },
    Profile {
        id: 7,
        name: "greg",
        username: "greg16676935420",
        avatar: "greg16676935420.jpg",
        bio: "im greg I like football and stocks and my birthday im from kentuckey. I'm a investor. I like to golf at the golf course @gregmultiverse • subscribe for $1 ⤴️",
    },
    Profile {
        id: 8,
        name: "TylerD 🧙‍♂️",
        username: "Tyler_Did_It",
        avatar: "Tyler_Did_It.jpg",
        bio: "NFT & Crypto news & analysis | @LuckyTraderHQ | @RugRadio | @fomohour at 10 am; Lucky Lead at 11 am | Writing The Morning Minute for 7,000+ readers | Pengu Maxi",
    },
    Profile {
        id: 9,
        name: "Sisyphus",
        username: "0xSisyphus",
        avatar: "0xSisyphus.jpg",
        bio: "Roll boulder up hill, it rolls back down.",
    },
    Profile {
        id: 10,
        name: "GCR",
        username: "GiganticRebirth",
        avatar: "GiganticRebirth.jpg",
        bio: "He who chases two rabbits catches neither",
    },
    Profile {
        id: 11,
        name: "nader dabit",
        username: "dabit3",
        avatar: "dabit3.jpg",
        bio: "🇵🇸 // devrel + dx @eigenlayer @eigen_da // react, ai, & on-chain // prev @avara @celestiaorg @awscloud // contributing @lensprotocol // 🫂 @developer_dao",
    },
    Profile {
        id: 12,
        name: "Beanie",
        username: "beaniemaxi",
        avatar: "beaniemaxi.jpg",
        bio: "Crypto native since the early days. Went all in on DeFi summer. Tripled down on NFTs before it became big. No paid promos. Not financial advice. I talk my book.",
    },
    Profile {
        id: 13,
        name: "Frank (degod mode)",
        username: "frankdegods",
        avatar: "frankdegods.jpg",
        bio: "social experimenter @degodsnft",
    },
    Profile {
        id: 14,
        name: "Luca Netz 🐧✳️",
        username: "LucaNetz",
        avatar: "LucaNetz.jpg",
        bio: "Striving for Greatness. @pudgypenguins @iglooinc @abstractchain",
    },
];

pub fn roster() -> &'static [Profile] {
    PROFILES
}

pub fn by_id(id: i64) -> Option<&'static Profile> {
    PROFILES.iter().find(|p| p.id == id)
}

/// Case-insensitive substring match over name and handle.
pub fn search(query: &str) -> Vec<&'static Profile> {
    let needle = query.to_lowercase();
    PROFILES
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.username.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_fixed() {
        assert_eq!(roster().len(), 14);
        assert!(by_id(1).is_some());
        assert!(by_id(15).is_none());
    }

    #[test]
    fn search_is_case_insensitive() {
        let hits = search("OLIMPIO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "OlimpioCrypto");
    }

    #[test]
    fn search_matches_handles_too() {
        let hits = search("0xsisyphus");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 9);
    }

    #[test]
    fn empty_query_matches_everyone() {
        assert_eq!(search("").len(), 14);
    }
}
