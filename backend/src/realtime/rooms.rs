use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Process-local registry of live realtime connections, keyed by room
/// (= match id). Horizontal scaling would need a pub/sub backplane in
/// place of this map.
pub struct RoomManager {
    rooms: DashMap<i64, Vec<RoomMember>>,
}

struct RoomMember {
    conn_id: Uuid,
    tx: mpsc::Sender<String>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    pub fn join(&self, room_id: i64, conn_id: Uuid, tx: mpsc::Sender<String>) {
        self.rooms
            .entry(room_id)
            .or_default()
            .push(RoomMember { conn_id, tx });
    }

    pub fn leave(&self, room_id: i64, conn_id: Uuid) {
        if let Some(mut members) = self.rooms.get_mut(&room_id) {
            members.retain(|member| member.conn_id != conn_id);
        }
        self.rooms.remove_if(&room_id, |_, members| members.is_empty());
    }

    /// Relay `payload` to every member of the room except the sender.
    /// Sends are fire-and-forget: a peer whose queue is full or whose
    /// connection is tearing down is skipped, never awaited. Returns the
    /// number of peers the payload was queued for.
    pub fn broadcast(&self, room_id: i64, sender_conn: Uuid, payload: &str) -> usize {
        let Some(members) = self.rooms.get(&room_id) else {
            return 0;
        };

        let mut delivered = 0;
        for member in members.iter() {
            if member.conn_id == sender_conn {
                continue;
            }
            match member.tx.try_send(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(room_id, conn_id = %member.conn_id, "dropping relay to peer: {err}");
                }
            }
        }
        delivered
    }

    pub fn member_count(&self, room_id: i64) -> usize {
        self.rooms
            .get(&room_id)
            .map_or(0, |members| members.len())
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
