//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! fortiapi binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{Direction, OrderedCollection, SortKey, SortSpec};

/// FortiOS API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "fortiapi", about = "FortiOS REST API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// VDOM to operate on (overrides FORTIOS_VDOM).
    #[arg(long, global = true, env = "FORTIOS_VDOM")]
    pub vdom: Option<String>,

    /// Log requests and moves to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entry by id or name.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The policy id, or the name for named objects.
        id: String,
    },

    /// List a whole table in appliance order.
    List {
        /// The type of entity to list.
        entity: Entity,
    },

    /// Sort an ordered table on the appliance.
    Sort {
        /// The table to sort.
        collection: Collection,

        #[command(flatten)]
        order: OrderArgs,
    },

    /// Report whether an ordered table is already sorted.
    Check {
        /// The table to check.
        collection: Collection,

        #[command(flatten)]
        order: OrderArgs,
    },

    /// Move one entry directly after or before another.
    Move {
        /// The table holding both entries.
        collection: Collection,

        /// Policy id of the entry to move.
        id: u64,

        /// Place the entry directly after this policy id.
        #[arg(long, conflicts_with = "before", required_unless_present = "before")]
        after: Option<u64>,

        /// Place the entry directly before this policy id.
        #[arg(long)]
        before: Option<u64>,
    },
}

/// Sort key and direction flags.
#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Field to order by.
    #[arg(long, value_enum, default_value = "id")]
    pub by: SortField,

    /// Sort descending instead of ascending.
    #[arg(long, default_value = "false")]
    pub desc: bool,
}

impl OrderArgs {
    pub fn spec(&self) -> SortSpec {
        SortSpec {
            key: self.by.into(),
            direction: if self.desc {
                Direction::Descending
            } else {
                Direction::Ascending
            },
        }
    }
}

/// Field names accepted by `--by`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    /// Policy id.
    Id,
    /// Entry name.
    Name,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Id => SortKey::Id,
            SortField::Name => SortKey::Name,
        }
    }
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A firewall policy.
    #[value(alias = "policies")]
    Policy,
    /// A proxy policy.
    #[value(alias = "proxy-policies")]
    ProxyPolicy,
    /// A central SNAT map entry.
    #[value(alias = "snat")]
    CentralSnatMap,
    /// A firewall address group.
    #[value(alias = "address-groups", alias = "addrgrp")]
    AddressGroup,
    /// A custom service.
    #[value(alias = "services")]
    Service,
}

/// Tables kept in evaluation order.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    /// The firewall policy table.
    #[value(alias = "policies")]
    Policy,
    /// The proxy policy table.
    #[value(alias = "proxy-policies")]
    ProxyPolicy,
    /// The central SNAT table.
    #[value(alias = "snat")]
    CentralSnatMap,
}

impl From<Collection> for OrderedCollection {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Policy => OrderedCollection::Policy,
            Collection::ProxyPolicy => OrderedCollection::ProxyPolicy,
            Collection::CentralSnatMap => OrderedCollection::CentralSnatMap,
        }
    }
}
