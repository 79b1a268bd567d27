use anyhow::{Context, Result};
use log::{error, info};
use simple_parking_lot::{
    config::Config,
    lot::Lot,
    types::{TicketId, VehicleClass},
};
use std::env::args;
use std::io::{stdin, stdout, BufRead, Write};

const MENU: &str = "
Menu:
1. Parking Entry Gate
2. Parking Exit Gate
3. Check Parking Status
4. Check Vehicle Status
5. Exit Program";

static VEHICLES: [VehicleClass; 4] = [
    VehicleClass::Car,
    VehicleClass::Motorbike,
    VehicleClass::Truck,
    VehicleClass::Van,
];

struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Prompt<R> {
    /// Ask a question; `None` once input runs out.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{question}");
        stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn ask_number(&mut self, question: &str) -> Result<Option<u64>> {
        loop {
            let answer = match self.ask(question)? {
                Some(answer) => answer,
                None => return Ok(None),
            };
            match answer.parse() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => println!("Invalid input. Please enter a number."),
            }
        }
    }
}

/// Menu choices are 1-based.
fn vehicle_choice(choice: u64) -> Option<VehicleClass> {
    choice
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| VEHICLES.get(index))
        .copied()
}

fn entry(lot: &mut Lot, prompt: &mut Prompt<impl BufRead>) -> Result<()> {
    let question = VEHICLES
        .iter()
        .enumerate()
        .map(|(index, vehicle_class)| format!("{}. {vehicle_class}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let choice = match prompt.ask_number(&format!("\nEnter vehicle type:\n{question}\n"))? {
        Some(choice) => choice,
        None => return Ok(()),
    };
    let vehicle_class = match vehicle_choice(choice) {
        Some(vehicle_class) => vehicle_class,
        None => {
            println!("Invalid vehicle type.");
            return Ok(());
        }
    };
    let plate = match prompt.ask("\nEnter vehicle number: ")? {
        Some(plate) => plate,
        None => return Ok(()),
    };
    match lot.request_entry(vehicle_class, plate) {
        Ok(ticket_id) => println!("Ticket issued. Ticket number: {ticket_id}"),
        Err(error) => println!("{error}"),
    }
    Ok(())
}

fn exit(lot: &mut Lot, prompt: &mut Prompt<impl BufRead>) -> Result<()> {
    if let Some(ticket) = prompt.ask_number("\nEnter ticket number: ")? {
        match lot.request_exit(TicketId(ticket)) {
            Ok(exit) => println!(
                "Vehicle Number: {}. Parking cost: {}.",
                exit.plate, exit.charge
            ),
            Err(error) => println!("{error}"),
        }
    }
    Ok(())
}

fn status(lot: &Lot, prompt: &mut Prompt<impl BufRead>) -> Result<()> {
    if let Some(ticket) = prompt.ask_number("\nEnter ticket number: ")? {
        match lot.query_vehicle_status(TicketId(ticket)) {
            Ok(snapshot) => {
                println!("Vehicle Number: {}", snapshot.plate);
                println!("Vehicle Type: {}", snapshot.vehicle_class);
                println!("Parking Spot Type: {}", snapshot.spot_class);
                println!(
                    "Parking Time: {}",
                    snapshot.entered_at.format("%d-%m-%Y, %H:%M:%S")
                );
                println!("Parking Charge: {}", snapshot.charge);
                println!("Ticket Status: {}", snapshot.status);
            }
            Err(error) => println!("{error}"),
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let config = match args().nth(1) {
        Some(path) => {
            info!("Reading config from {:?}", path);
            Config::from_path(&path).with_context(|| format!("loading config {path:?}"))?
        }
        None => Config::default(),
    };
    let mut lot = Lot::new(config);
    let mut prompt = Prompt {
        input: stdin().lock(),
    };

    loop {
        println!("{MENU}");
        let choice = match prompt.ask_number("\nEnter your choice: ")? {
            Some(choice) => choice,
            None => break,
        };
        match choice {
            1 => entry(&mut lot, &mut prompt)?,
            2 => exit(&mut lot, &mut prompt)?,
            3 => println!("{}", lot.query_availability()),
            4 => status(&lot, &mut prompt)?,
            5 => break,
            _ => println!("Invalid choice. Please select a valid option."),
        }
    }
    println!("Exiting program. Goodbye!");
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run() {
        Ok(()) => {}
        Err(error) => {
            error!("{}", error);
            std::process::exit(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vehicle_menu_choices() {
        assert_eq!(vehicle_choice(1), Some(VehicleClass::Car));
        assert_eq!(vehicle_choice(2), Some(VehicleClass::Motorbike));
        assert_eq!(vehicle_choice(4), Some(VehicleClass::Van));
        assert_eq!(vehicle_choice(0), None);
        assert_eq!(vehicle_choice(5), None);
        assert_eq!(vehicle_choice(u64::MAX), None);
    }
}
