//! Shared fixtures for import integration tests

#![allow(dead_code)]

use card_sync::init_schema;
use rusqlite::Connection;
use std::io::{Cursor, Write};

/// Create an in-memory database with the schema applied
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

/// Count rows of a table
pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

/// Zip a single JSON document the way MTGJSON ships its dump
pub fn mtgjson_archive(sets: &serde_json::Value) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("AllSets-x.json", zip::write::FileOptions::default())
        .unwrap();
    writer
        .write_all(serde_json::to_string(sets).unwrap().as_bytes())
        .unwrap();
    writer.finish().unwrap().into_inner()
}

pub const LONGEST_NAME: &str = "Our Market Research Shows That Players Like Really Long Card Names \
                                So We Made this Card to Have the Absolute Longest Card Name Ever Elemental";

/// A small slice of the MTGJSON dump covering UNH, AVR and BOK
pub fn mtgjson_sets() -> serde_json::Value {
    serde_json::json!({
        "UNH": {
            "name": "Unhinged",
            "cards": [
                {
                    "name": LONGEST_NAME,
                    "layout": "normal",
                    "manaCost": "{11}{G}",
                    "text": "Trample",
                    "power": "1",
                    "toughness": "1",
                    "types": ["Creature"],
                    "subtypes": ["Elemental"],
                    "artist": "Jim Pavelec",
                    "multiverseid": 74237,
                    "rarity": "Uncommon",
                    "number": "116"
                },
                {
                    "name": "Who",
                    "layout": "split",
                    "types": ["Instant"],
                    "artist": "Quinton Hoover",
                    "rarity": "Rare",
                    "number": "55"
                }
            ]
        },
        "AVR": {
            "name": "Avacyn Restored",
            "cards": [
                {
                    "name": "Tamiyo, the Moon Sage",
                    "layout": "normal",
                    "manaCost": "{3}{U}{U}",
                    "text": "+1: Tap target permanent. It doesn't untap during its controller's next untap step.",
                    "loyalty": 4,
                    "supertypes": ["Legendary"],
                    "types": ["Planeswalker"],
                    "subtypes": ["Tamiyo"],
                    "artist": "Eric Deschamps",
                    "multiverseid": 240070,
                    "rarity": "Mythic Rare",
                    "number": "79"
                },
                {
                    "name": "Ulvenwald Tracker",
                    "layout": "normal",
                    "manaCost": "{G}",
                    "text": "{1}{G}, {T}: Target creature you control fights another target creature.",
                    "power": "1",
                    "toughness": "1",
                    "types": ["Creature"],
                    "subtypes": ["Human", "Shaman"],
                    "artist": "Jesper Ejsing",
                    "multiverseid": 240009,
                    "rarity": "Rare",
                    "number": "198"
                },
                {
                    "name": "Spirit",
                    "layout": "token",
                    "types": ["Creature"],
                    "subtypes": ["Spirit"],
                    "rarity": "Common"
                }
            ]
        },
        "BOK": {
            "name": "Betrayers of Kamigawa",
            "cards": [
                {
                    "name": "Jaraku the Interloper",
                    "layout": "flip",
                    "manaCost": "{2}{U}",
                    "supertypes": ["Legendary"],
                    "types": ["Creature"],
                    "subtypes": ["Human", "Wizard"],
                    "artist": "Jim Murray",
                    "multiverseid": 74093,
                    "rarity": "Uncommon",
                    "number": "31"
                },
                {
                    "name": "Jaraku the Interloper",
                    "layout": "flip",
                    "manaCost": "{2}{U}",
                    "supertypes": ["Legendary"],
                    "types": ["Creature"],
                    "subtypes": ["Human", "Wizard"],
                    "artist": "Jim Murray",
                    "multiverseid": 74093,
                    "rarity": "Uncommon",
                    "number": "31"
                },
                {
                    "name": "Scarmaker",
                    "layout": "flip",
                    "manaCost": "{1}{R}",
                    "supertypes": ["Legendary"],
                    "types": ["Creature"],
                    "subtypes": ["Human", "Samurai"],
                    "artist": "Christopher Moeller",
                    "multiverseid": 74127,
                    "rarity": "Uncommon",
                    "number": "117"
                },
                {
                    "name": "Scarmaker",
                    "layout": "flip",
                    "manaCost": "{1}{R}",
                    "supertypes": ["Legendary"],
                    "types": ["Creature"],
                    "subtypes": ["Human", "Samurai"],
                    "artist": "Christopher Moeller",
                    "multiverseid": 74127,
                    "rarity": "Uncommon",
                    "number": "117"
                },
                {
                    "name": "Ninja of the Deep Hours",
                    "layout": "normal",
                    "manaCost": "{3}{U}",
                    "types": ["Creature"],
                    "subtypes": ["Human", "Ninja"],
                    "artist": "Dan Scott",
                    "multiverseid": 74587,
                    "rarity": "Common",
                    "number": "39"
                }
            ]
        }
    })
}

/// One FABDB printing
pub fn fab_printing(sku: &str, set_code: &str, set_name: &str, image: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "rarity": "C",
        "image": image,
        "language": "en",
        "sku": {
            "sku": sku,
            "finish": "regular",
            "set": { "id": set_code, "name": set_name }
        }
    })
}

/// One FABDB card with the given printings
pub fn fab_card(
    identifier: &str,
    name: &str,
    printings: Vec<serde_json::Value>,
) -> serde_json::Value {
    serde_json::json!({
        "identifier": identifier,
        "name": name,
        "text": format!("Text of {name}"),
        "keywords": ["generic", "action"],
        "rarity": "C",
        "stats": { "cost": "0", "defense": 2, "resource": "1" },
        "printings": printings
    })
}

/// Wrap cards in a FABDB listing page
pub fn fab_page(cards: &[serde_json::Value], current_page: u32, last_page: u32) -> serde_json::Value {
    serde_json::json!({
        "data": cards,
        "meta": { "current_page": current_page, "last_page": last_page }
    })
}
