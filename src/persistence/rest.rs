//! PostgREST client for the remote store (`<url>/rest/v1/<table>`).

use super::remote::{
    ChangeHandler, ClassTypeRecord, Collection, RemoteError, RemoteStore, ScheduleRecord,
    Subscription, TeacherRecord,
};
use crate::models::room::Room;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

pub struct RestRemote {
    client: Client,
    base_url: String,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => RemoteError::Backend {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None => RemoteError::Network(e.to_string()),
        }
    }
}

impl RestRemote {
    /// Build a client authenticated with the project's anon key.
    pub fn new(url: &str, key: &str, timeout_secs: u64) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(key)
            .map_err(|_| RemoteError::Validation("remote key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
            .map_err(|_| RemoteError::Validation("remote key is not a valid header value".into()))?;
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| RemoteError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    fn table(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(RemoteError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    fn list<T: DeserializeOwned>(&self, table: &str, room: Option<Room>) -> Result<Vec<T>, RemoteError> {
        let mut request = self.client.get(self.table(table)).query(&[("select", "*")]);
        if let Some(room) = room {
            request = request.query(&[("room", format!("eq.{}", room.code()))]);
        }
        Ok(Self::send(request)?.json()?)
    }

    /// Insert one row and return the stored representation.
    fn insert<T: DeserializeOwned>(&self, table: &str, body: serde_json::Value) -> Result<T, RemoteError> {
        let request = self
            .client
            .post(self.table(table))
            .header("Prefer", "return=representation")
            .json(&body);
        let mut rows: Vec<T> = Self::send(request)?.json()?;
        if rows.is_empty() {
            return Err(RemoteError::Validation(format!("insert into {} returned no row", table)));
        }
        Ok(rows.remove(0))
    }

    fn rename(&self, table: &str, id: i64, name: &str) -> Result<(), RemoteError> {
        let request = self
            .client
            .patch(self.table(table))
            .query(&[("id", format!("eq.{}", id))])
            .json(&json!({ "name": name }));
        Self::send(request)?;
        Ok(())
    }

    fn delete_by_id(&self, table: &str, id: i64) -> Result<(), RemoteError> {
        let request = self
            .client
            .delete(self.table(table))
            .query(&[("id", format!("eq.{}", id))]);
        Self::send(request)?;
        Ok(())
    }
}

impl RemoteStore for RestRemote {
    fn list_teachers(&self, room: Option<Room>) -> Result<Vec<TeacherRecord>, RemoteError> {
        self.list(Collection::Teachers.table(), room)
    }

    fn list_class_types(&self, room: Option<Room>) -> Result<Vec<ClassTypeRecord>, RemoteError> {
        self.list(Collection::ClassTypes.table(), room)
    }

    fn list_schedule(&self, room: Option<Room>) -> Result<Vec<ScheduleRecord>, RemoteError> {
        self.list(Collection::Schedule.table(), room)
    }

    fn insert_teacher(&self, name: &str, room: Room) -> Result<TeacherRecord, RemoteError> {
        self.insert(
            Collection::Teachers.table(),
            json!({ "name": name, "room": room }),
        )
    }

    fn insert_class_type(
        &self,
        name: &str,
        room: Room,
        level: &str,
    ) -> Result<ClassTypeRecord, RemoteError> {
        self.insert(
            Collection::ClassTypes.table(),
            json!({ "name": name, "room": room, "level": level }),
        )
    }

    fn update_teacher_name(&self, id: i64, name: &str) -> Result<(), RemoteError> {
        self.rename(Collection::Teachers.table(), id, name)
    }

    fn update_class_type_name(&self, id: i64, name: &str) -> Result<(), RemoteError> {
        self.rename(Collection::ClassTypes.table(), id, name)
    }

    fn delete_teacher(&self, id: i64) -> Result<(), RemoteError> {
        self.delete_by_id(Collection::Teachers.table(), id)
    }

    fn delete_class_type(&self, id: i64) -> Result<(), RemoteError> {
        self.delete_by_id(Collection::ClassTypes.table(), id)
    }

    fn upsert_schedule(&self, record: &ScheduleRecord) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(self.table(Collection::Schedule.table()))
            .query(&[("on_conflict", "day,time,room")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(record);
        Self::send(request)?;
        Ok(())
    }

    fn delete_schedule(&self, day: &str, time: &str, room: Room) -> Result<(), RemoteError> {
        let request = self
            .client
            .delete(self.table(Collection::Schedule.table()))
            .query(&[
                ("day", format!("eq.{}", day)),
                ("time", format!("eq.{}", time)),
                ("room", format!("eq.{}", room.code())),
            ]);
        Self::send(request)?;
        Ok(())
    }

    fn subscribe(
        &self,
        collection: Collection,
        _handler: ChangeHandler,
    ) -> Result<Subscription, RemoteError> {
        Err(RemoteError::Unsupported(format!(
            "change feed for '{}' needs a realtime channel",
            collection
        )))
    }
}
