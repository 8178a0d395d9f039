//! Temporal playback and prediction engine for Tidewatch.
//!
//! This crate turns one slider value into a complete [`Frame`]: recorded
//! vessels in the past half, synthetic ones in the forecast half, the live
//! feed on the pivot, the environment snapshot, a bridge conflict forecast,
//! and any scripted crisis the step crossed.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `tidewatch-config.yaml` into
//!   strongly-typed structs.
//! - [`mapper`] -- Slider value to source/display timestamp mapping.
//! - [`future`] -- Forecast-half vessel synthesis.
//! - [`crisis`] -- Crisis scheduling over autoplay steps.
//! - [`forecast`] -- Bridge ETA risk and tide estimate.
//! - [`playback`] -- [`PlaybackState`] and its pure reducers.
//! - [`engine`] -- [`PlaybackEngine`], frame assembly for one session.
//! - [`control`] -- Flags shared between the clock task and its handle.
//! - [`runner`] -- The autoplay loop, frame consumers and report sinks.
//! - [`clock`] -- [`AutoplayClock`], the handle to a running session.
//!
//! [`Frame`]: tidewatch_types::Frame
//! [`PlaybackState`]: playback::PlaybackState
//! [`PlaybackEngine`]: engine::PlaybackEngine
//! [`AutoplayClock`]: clock::AutoplayClock

pub mod clock;
pub mod config;
pub mod control;
pub mod crisis;
pub mod engine;
pub mod forecast;
pub mod future;
pub mod mapper;
pub mod playback;
pub mod runner;
