//! FortiOS API CLI binary.
//!
//! A command-line interface for inspecting and reordering FortiGate
//! configuration tables.

use clap::Parser;
use fortiapi::cli::{Cli, Command, Entity};
use fortiapi::{
    join_names, AddressGroup, CentralSnatMap, FortiClient, FortiError, Get, List, MovePosition,
    OrderedCollection, Policy, PrettyPrint, ProxyPolicy, ServiceCustom,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = match FortiClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set FORTIOS_API_TOKEN and FORTIOS_API_URL environment variables");
            return ExitCode::FAILURE;
        }
    };
    let client = match cli.vdom.as_deref() {
        Some(vdom) => client.with_vdom(vdom),
        None => client,
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(client: &FortiClient, cli: Cli) -> fortiapi::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, &id, cli.json).await,
        Command::List { entity } => handle_list(client, entity, cli.json).await,
        Command::Sort { collection, order } => {
            let collection = OrderedCollection::from(collection);
            let outcome = collection.sort(client, order.spec()).await?;
            output_single(&outcome, cli.json)
        }
        Command::Check { collection, order } => {
            let collection = OrderedCollection::from(collection);
            let spec = order.spec();
            let sorted = collection.is_sorted(client, spec).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "sorted": sorted }));
            } else {
                let verdict = if sorted { "is" } else { "is not" };
                println!(
                    "{} table {verdict} sorted by {} ({:?})",
                    collection.entity(),
                    spec.key,
                    spec.direction
                );
            }
            Ok(())
        }
        Command::Move {
            collection,
            id,
            after,
            before,
        } => {
            let (position, target) = match (after, before) {
                (Some(target), _) => (MovePosition::After, target),
                (None, Some(target)) => (MovePosition::Before, target),
                (None, None) => {
                    return Err(FortiError::InvalidArgument(
                        "one of --after or --before is required".to_string(),
                    ))
                }
            };
            OrderedCollection::from(collection)
                .move_entry(client, id, position, target)
                .await?;
            if !cli.json {
                println!("Moved {id} {} {target}", position.as_param());
            }
            Ok(())
        }
    }
}

fn parse_policy_id(id: &str) -> fortiapi::Result<u64> {
    id.parse()
        .map_err(|_| FortiError::InvalidArgument(format!("policy id must be a number: {id}")))
}

async fn handle_get(
    client: &FortiClient,
    entity: Entity,
    id: &str,
    json: bool,
) -> fortiapi::Result<()> {
    match entity {
        Entity::Policy => {
            let policy = Policy::get(client, parse_policy_id(id)?).await?;
            output_single(&policy, json)
        }
        Entity::ProxyPolicy => {
            let policy = ProxyPolicy::get(client, parse_policy_id(id)?).await?;
            output_single(&policy, json)
        }
        Entity::CentralSnatMap => {
            let entry = CentralSnatMap::get(client, parse_policy_id(id)?).await?;
            output_single(&entry, json)
        }
        Entity::AddressGroup => {
            let group = AddressGroup::get(client, id.to_string()).await?;
            output_single(&group, json)
        }
        Entity::Service => {
            let service = ServiceCustom::get(client, id.to_string()).await?;
            output_single(&service, json)
        }
    }
}

async fn handle_list(client: &FortiClient, entity: Entity, json: bool) -> fortiapi::Result<()> {
    match entity {
        Entity::Policy => {
            let policies = Policy::list(client).await?;
            output_list(&policies, json, |x| PolicyRow::from(x))
        }
        Entity::ProxyPolicy => {
            let policies = ProxyPolicy::list(client).await?;
            output_list(&policies, json, |x| ProxyPolicyRow::from(x))
        }
        Entity::CentralSnatMap => {
            let entries = CentralSnatMap::list(client).await?;
            output_list(&entries, json, |x| SnatRow::from(x))
        }
        Entity::AddressGroup => {
            let groups = AddressGroup::list(client).await?;
            output_list(&groups, json, |x| AddressGroupRow::from(x))
        }
        Entity::Service => {
            let services = ServiceCustom::list(client).await?;
            output_list(&services, json, |x| ServiceRow::from(x))
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> fortiapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> fortiapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} entries", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct PolicyRow {
    id: u64,
    name: String,
    action: String,
    source: String,
    destination: String,
    service: String,
}

impl From<&Policy> for PolicyRow {
    fn from(p: &Policy) -> Self {
        Self {
            id: p.policyid,
            name: p.name.clone(),
            action: p.action.clone().unwrap_or_default(),
            source: join_names(&p.srcaddr),
            destination: join_names(&p.dstaddr),
            service: join_names(&p.service),
        }
    }
}

#[derive(Tabled)]
struct ProxyPolicyRow {
    id: u64,
    name: String,
    proxy: String,
    action: String,
}

impl From<&ProxyPolicy> for ProxyPolicyRow {
    fn from(p: &ProxyPolicy) -> Self {
        Self {
            id: p.policyid,
            name: p.name.clone().unwrap_or_default(),
            proxy: p.proxy.clone().unwrap_or_default(),
            action: p.action.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct SnatRow {
    id: u64,
    #[tabled(rename = "orig-addr")]
    orig_addr: String,
    #[tabled(rename = "dst-addr")]
    dst_addr: String,
    nat: String,
}

impl From<&CentralSnatMap> for SnatRow {
    fn from(s: &CentralSnatMap) -> Self {
        Self {
            id: s.policyid,
            orig_addr: join_names(&s.orig_addr),
            dst_addr: join_names(&s.dst_addr),
            nat: s.nat.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AddressGroupRow {
    name: String,
    members: String,
}

impl From<&AddressGroup> for AddressGroupRow {
    fn from(g: &AddressGroup) -> Self {
        Self {
            name: g.name.clone(),
            members: join_names(&g.member),
        }
    }
}

#[derive(Tabled)]
struct ServiceRow {
    name: String,
    protocol: String,
    tcp: String,
    udp: String,
}

impl From<&ServiceCustom> for ServiceRow {
    fn from(s: &ServiceCustom) -> Self {
        Self {
            name: s.name.clone(),
            protocol: s.protocol.clone().unwrap_or_default(),
            tcp: s.tcp_portrange.clone().unwrap_or_default(),
            udp: s.udp_portrange.clone().unwrap_or_default(),
        }
    }
}
