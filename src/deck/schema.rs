//! Anki collection layout (schema version 11).

use serde_json::{json, Value};

pub const SCHEMA_VERSION: i64 = 11;

/// Creation time Anki expects for imported collections.
pub const COLLECTION_CREATED: i64 = 1411124400;

pub const DEFAULT_DECK_ID: i64 = 1;

pub const APKG_SCHEMA: &str = r#"
CREATE TABLE col (
    id              integer primary key,
    crt             integer not null,
    mod             integer not null,
    scm             integer not null,
    ver             integer not null,
    dty             integer not null,
    usn             integer not null,
    ls              integer not null,
    conf            text not null,
    models          text not null,
    decks           text not null,
    dconf           text not null,
    tags            text not null
);
CREATE TABLE notes (
    id              integer primary key,
    guid            text not null,
    mid             integer not null,
    mod             integer not null,
    usn             integer not null,
    tags            text not null,
    flds            text not null,
    sfld            integer not null,
    csum            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE cards (
    id              integer primary key,
    nid             integer not null,
    did             integer not null,
    ord             integer not null,
    mod             integer not null,
    usn             integer not null,
    type            integer not null,
    queue           integer not null,
    due             integer not null,
    ivl             integer not null,
    factor          integer not null,
    reps            integer not null,
    lapses          integer not null,
    left            integer not null,
    odue            integer not null,
    odid            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE revlog (
    id              integer primary key,
    cid             integer not null,
    usn             integer not null,
    ease            integer not null,
    ivl             integer not null,
    lastIvl         integer not null,
    factor          integer not null,
    time            integer not null,
    type            integer not null
);
CREATE TABLE graves (
    usn             integer not null,
    oid             integer not null,
    type            integer not null
);
CREATE INDEX ix_notes_usn on notes (usn);
CREATE INDEX ix_cards_usn on cards (usn);
CREATE INDEX ix_revlog_usn on revlog (usn);
CREATE INDEX ix_cards_nid on cards (nid);
CREATE INDEX ix_cards_sched on cards (did, queue, due);
CREATE INDEX ix_revlog_cid on revlog (cid);
CREATE INDEX ix_notes_csum on notes (csum);
"#;

pub fn collection_conf(model_id: i64) -> Value {
    json!({
        "activeDecks": [DEFAULT_DECK_ID],
        "addToCur": true,
        "collapseTime": 1200,
        "curDeck": DEFAULT_DECK_ID,
        "curModel": model_id.to_string(),
        "dueCounts": true,
        "estTimes": true,
        "newBury": true,
        "newSpread": 0,
        "nextPos": 1,
        "sortBackwards": false,
        "sortType": "noteFld",
        "timeLim": 0,
    })
}

fn deck_json(id: i64, name: &str, modified: i64) -> Value {
    json!({
        "collapsed": false,
        "conf": 1,
        "desc": "",
        "dyn": 0,
        "extendNew": 10,
        "extendRev": 50,
        "id": id,
        "lrnToday": [0, 0],
        "mod": modified,
        "name": name,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "timeToday": [0, 0],
        "usn": -1,
    })
}

/// The `decks` column: Anki's default deck plus the generated one.
pub fn collection_decks(deck_id: i64, title: &str, modified: i64) -> Value {
    json!({
        DEFAULT_DECK_ID.to_string(): deck_json(DEFAULT_DECK_ID, "Default", modified),
        deck_id.to_string(): deck_json(deck_id, title, modified),
    })
}

pub fn collection_dconf() -> Value {
    json!({
        "1": {
            "autoplay": true,
            "id": 1,
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0,
            },
            "maxTaken": 60,
            "mod": 0,
            "name": "Default",
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true,
            },
            "replayq": true,
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100,
            },
            "timer": 0,
            "usn": 0,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decks_include_default() {
        let decks = collection_decks(1234567890, "Italian Game", 10);
        assert_eq!(decks["1"]["name"], "Default");
        assert_eq!(decks["1234567890"]["name"], "Italian Game");
        assert_eq!(decks["1234567890"]["id"], 1234567890i64);
    }

    #[test]
    fn test_schema_applies() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(APKG_SCHEMA).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
    }
}
