use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use cabin_core::{BookingFilter, DataService, ServiceError, Table};
use cabin_domain::{
    Booking, BookingId, BookingPatch, Cabin, CabinId, Guest, GuestId, NewBooking, Settings,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Current on-disk layout version of `store.json`.
pub const SCHEMA_VERSION: u32 = 1;

const STORE_FILE: &str = "store.json";
const STORE_EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

#[derive(Debug, Clone)]
pub struct StorePaths {
    pub store_file: PathBuf,
    pub backup_root: PathBuf,
}

impl StorePaths {
    /// Standard layout under a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            store_file: dir.join(STORE_FILE),
            backup_root: dir.join(BACKUP_DIR),
        }
    }
}

/// Everything persisted in `store.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub schema_version: u32,
    pub next_booking_id: BookingId,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub cabins: Vec<Cabin>,
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_booking_id: 1,
            bookings: Vec::new(),
            cabins: Vec::new(),
            guests: Vec::new(),
            settings: Some(Settings::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// File-backed [`DataService`]. Each mutation rewrites the whole snapshot
/// atomically after copying the previous file into the backup directory.
#[derive(Debug)]
pub struct JsonDataService {
    paths: StorePaths,
    retention: usize,
    state: Mutex<StoreSnapshot>,
}

impl JsonDataService {
    pub fn open(paths: StorePaths) -> Result<Self, ServiceError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StorePaths, retention: usize) -> Result<Self, ServiceError> {
        fs::create_dir_all(&paths.backup_root)?;
        let snapshot = if paths.store_file.exists() {
            load_snapshot(&paths.store_file)?
        } else {
            debug!(path = %paths.store_file.display(), "initializing empty store");
            StoreSnapshot::default()
        };
        Ok(Self {
            paths,
            retention: retention.max(1),
            state: Mutex::new(snapshot),
        })
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot, ServiceError> {
        Ok(self.lock()?.clone())
    }

    pub fn add_cabin(
        &self,
        name: &str,
        max_capacity: u32,
        regular_price: f64,
        discount: f64,
    ) -> Result<Cabin, ServiceError> {
        let cabin = self.mutate(|store| {
            let id: CabinId = store.cabins.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            let cabin = Cabin::new(id, name.trim(), max_capacity, regular_price, discount);
            if !cabin.has_valid_rate() {
                return Err(ServiceError::InvalidRecord {
                    table: Table::Cabins,
                    reason: format!("discount {discount} exceeds regular price {regular_price}"),
                });
            }
            store.cabins.push(cabin.clone());
            Ok(cabin)
        })?;
        info!(cabin_id = cabin.id, name = %cabin.name, "cabin added");
        Ok(cabin)
    }

    pub fn add_guest(&self, full_name: &str, email: &str) -> Result<Guest, ServiceError> {
        let guest = self.mutate(|store| {
            if full_name.trim().is_empty() {
                return Err(ServiceError::InvalidRecord {
                    table: Table::Guests,
                    reason: "full name is required".into(),
                });
            }
            let id: GuestId = store.guests.iter().map(|g| g.id).max().unwrap_or(0) + 1;
            let guest = Guest::new(id, full_name.trim(), email.trim());
            store.guests.push(guest.clone());
            Ok(guest)
        })?;
        info!(guest_id = guest.id, "guest added");
        Ok(guest)
    }

    /// Replaces the settings singleton after checking it is consistent.
    pub fn update_settings(&self, settings: Settings) -> Result<Settings, ServiceError> {
        if let Some(issue) = settings.issues().first() {
            return Err(ServiceError::InvalidRecord {
                table: Table::Settings,
                reason: issue.to_string(),
            });
        }
        self.mutate(|store| {
            store.settings = Some(settings.clone());
            Ok(())
        })?;
        info!(?settings, "settings updated");
        Ok(settings)
    }

    /// Backups of the store, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, ServiceError> {
        let dir = &self.paths.backup_root;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                entries.push(BackupInfo {
                    id: file_name.to_string(),
                    path: path.clone(),
                    size_bytes,
                });
            }
        }
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>, ServiceError> {
        self.state
            .lock()
            .map_err(|_| ServiceError::Unavailable("store lock poisoned".into()))
    }

    /// Applies `change` to a copy of the snapshot and commits it only once
    /// the file has been written.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreSnapshot) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut state = self.lock()?;
        let mut next = state.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(value)
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), ServiceError> {
        let path = &self.paths.store_file;
        if path.exists() {
            self.backup_existing_file(path)?;
        }
        let tmp = tmp_path(path);
        write_atomic(&tmp, &serialize_snapshot(snapshot)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn backup_existing_file(&self, path: &Path) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.paths.backup_root)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("store_{timestamp}.{STORE_EXTENSION}");
        fs::copy(path, self.paths.backup_root.join(file_name))?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), ServiceError> {
        let mut entries = self.list_backups()?;
        entries.sort_by_key(|info| Reverse(info.id.clone()));
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl DataService for JsonDataService {
    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ServiceError> {
        Ok(filter.apply(self.lock()?.bookings.iter()))
    }

    fn get_booking(&self, id: BookingId) -> Result<Booking, ServiceError> {
        self.lock()?
            .bookings
            .iter()
            .find(|booking| booking.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound {
                table: Table::Bookings,
                id,
            })
    }

    fn insert_booking(&self, draft: &NewBooking) -> Result<Booking, ServiceError> {
        self.mutate(|store| {
            let id = store.next_booking_id.max(1);
            store.next_booking_id = id + 1;
            let booking = draft.clone().into_booking(id, Utc::now());
            store.bookings.push(booking.clone());
            Ok(booking)
        })
    }

    fn update_booking(&self, id: BookingId, patch: &BookingPatch) -> Result<Booking, ServiceError> {
        self.mutate(|store| {
            let booking = store
                .bookings
                .iter_mut()
                .find(|booking| booking.id == id)
                .ok_or(ServiceError::NotFound {
                    table: Table::Bookings,
                    id,
                })?;
            patch.apply_to(booking);
            Ok(booking.clone())
        })
    }

    fn delete_booking(&self, id: BookingId) -> Result<(), ServiceError> {
        self.mutate(|store| {
            let before = store.bookings.len();
            store.bookings.retain(|booking| booking.id != id);
            if store.bookings.len() == before {
                return Err(ServiceError::NotFound {
                    table: Table::Bookings,
                    id,
                });
            }
            Ok(())
        })
    }

    fn list_guests(&self) -> Result<Vec<Guest>, ServiceError> {
        Ok(self.lock()?.guests.clone())
    }

    fn list_cabins(&self) -> Result<Vec<Cabin>, ServiceError> {
        Ok(self.lock()?.cabins.clone())
    }

    fn settings(&self) -> Result<Settings, ServiceError> {
        self.lock()?
            .settings
            .clone()
            .ok_or(ServiceError::NotFound {
                table: Table::Settings,
                id: 1,
            })
    }
}

/// Reads a snapshot, refusing files written by a newer layout.
pub fn load_snapshot(path: &Path) -> Result<StoreSnapshot, ServiceError> {
    let data = fs::read_to_string(path)?;
    let snapshot: StoreSnapshot =
        serde_json::from_str(&data).map_err(|err| ServiceError::Serde(err.to_string()))?;
    if snapshot.schema_version > SCHEMA_VERSION {
        return Err(ServiceError::InvalidRecord {
            table: Table::Bookings,
            reason: format!(
                "store schema version {} is newer than supported version {}",
                snapshot.schema_version, SCHEMA_VERSION
            ),
        });
    }
    Ok(snapshot)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ServiceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_snapshot(snapshot: &StoreSnapshot) -> Result<String, ServiceError> {
    serde_json::to_string_pretty(snapshot).map_err(|err| ServiceError::Serde(err.to_string()))
}
