// ABOUTME: Wire and domain models shared by the engine and its calling layer
// ABOUTME: Re-exports action, chat and fitness record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Models
//!
//! - [`action`]: the `Action` tagged union and its payloads. Field names and
//!   units (kg, grams, kcal) are copied verbatim into log records downstream.
//! - [`chat`]: inbound `Message`, `Attachment`, `AssistantReply`, history turns
//!   and the persisted chat record.
//! - [`fitness`]: profile, meal plan, routine and log records.

pub mod action;
pub mod chat;
pub mod fitness;

pub use action::{
    Action, ActionType, ExercisePayload, ExerciseProposal, FoodPayload, FoodProposal,
    HiddenContext, MealEntry,
};
pub use chat::{
    AssistantReply, Attachment, AttachmentKind, ChatMessageRecord, ChatRole, ChatTurn, Message,
};
pub use fitness::{
    ActivityLevel, ExerciseLog, ExerciseLogItem, GoalMethod, MealLog, MealPlanItem, Profile,
    RoutineItem, Sex,
};
