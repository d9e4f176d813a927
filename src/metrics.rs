//! Lightweight global metrics for the ring log.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - producer (append/rotation/wrap/flush)
//! - consumer (records read, empty polls, header resamples)
//! - валидационные чекпоинты

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Producer -----
static RECORDS_APPENDED: AtomicU64 = AtomicU64::new(0);
static BYTES_APPENDED: AtomicU64 = AtomicU64::new(0);
static PAGE_ROTATIONS: AtomicU64 = AtomicU64::new(0);
static RING_WRAPS: AtomicU64 = AtomicU64::new(0);
static VIEW_FLUSHES: AtomicU64 = AtomicU64::new(0);

// ----- Consumer -----
static RECORDS_READ: AtomicU64 = AtomicU64::new(0);
static EMPTY_POLLS: AtomicU64 = AtomicU64::new(0);
static HEADER_RESAMPLES: AtomicU64 = AtomicU64::new(0);

// ----- Valid checkpoints -----
static VALID_STOPS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub records_appended: u64,
    pub bytes_appended: u64,
    pub page_rotations: u64,
    pub ring_wraps: u64,
    pub view_flushes: u64,

    pub records_read: u64,
    pub empty_polls: u64,
    pub header_resamples: u64,

    pub valid_stops: u64,
}

pub fn record_append(bytes: usize) {
    RECORDS_APPENDED.fetch_add(1, Ordering::Relaxed);
    BYTES_APPENDED.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_page_rotation(wrapped: bool) {
    PAGE_ROTATIONS.fetch_add(1, Ordering::Relaxed);
    if wrapped {
        RING_WRAPS.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_view_flush() {
    VIEW_FLUSHES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_read() {
    RECORDS_READ.fetch_add(1, Ordering::Relaxed);
}

pub fn record_empty_poll() {
    EMPTY_POLLS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_header_resample() {
    HEADER_RESAMPLES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_valid_stop() {
    VALID_STOPS.fetch_add(1, Ordering::Relaxed);
}

/// Снять текущее состояние всех счётчиков.
pub fn metrics_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        records_appended: RECORDS_APPENDED.load(Ordering::Relaxed),
        bytes_appended: BYTES_APPENDED.load(Ordering::Relaxed),
        page_rotations: PAGE_ROTATIONS.load(Ordering::Relaxed),
        ring_wraps: RING_WRAPS.load(Ordering::Relaxed),
        view_flushes: VIEW_FLUSHES.load(Ordering::Relaxed),
        records_read: RECORDS_READ.load(Ordering::Relaxed),
        empty_polls: EMPTY_POLLS.load(Ordering::Relaxed),
        header_resamples: HEADER_RESAMPLES.load(Ordering::Relaxed),
        valid_stops: VALID_STOPS.load(Ordering::Relaxed),
    }
}
