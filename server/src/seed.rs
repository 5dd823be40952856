//! Seed data served by the mock users resource.

use std::path::Path;

use umapp_engine::{UserFields, UserRecord};

use crate::config::ConfigError;

const FIXTURE: [(&str, &str, &str); 10] = [
    ("Leanne Graham", "Sincere@april.biz", "1-770-736-8031 x56442"),
    ("Ervin Howell", "Shanna@melissa.tv", "010-692-6593 x09125"),
    ("Clementine Bauch", "Nathan@yesenia.net", "1-463-123-4447"),
    ("Patricia Lebsack", "Julianne.OConner@kory.org", "493-170-9623 x156"),
    ("Chelsey Dietrich", "Lucio_Hettinger@annie.ca", "(254)954-1289"),
    ("Mrs. Dennis Schulist", "Karley_Dach@jasper.info", "1-477-935-8478 x6430"),
    ("Kurtis Weissnat", "Telly.Hoeger@billy.biz", "210.067.6132"),
    ("Nicholas Runolfsdottir V", "Sherwood@rosamond.me", "586.493.6943 x140"),
    ("Glenna Reichert", "Chaim_McDermott@dana.io", "(775)976-6794 x41206"),
    ("Clementina DuBuque", "Rey.Padberg@karina.biz", "024-648-3804"),
];

/// The built-in users, ids 1 through 10.
pub fn default_users() -> Vec<UserRecord> {
    FIXTURE
        .iter()
        .zip(1..)
        .map(|((name, email, phone), id)| {
            UserRecord::from_fields(id, UserFields::new(*name, *email, *phone))
        })
        .collect()
}

/// Load users from a JSON array on disk.
pub fn load_users(path: &Path) -> Result<Vec<UserRecord>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSeedFile {
        path: path.to_path_buf(),
        reason,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))
}
