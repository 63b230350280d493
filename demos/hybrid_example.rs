use cipherbench::{random_payload, unframe, AlgorithmProvider, RsaAesHybridProvider};
use std::time::Instant;

fn main() {
    println!("\n=== RSA+AES Hybrid Example ===");
    println!();

    let hybrid = RsaAesHybridProvider::new();
    let keys = match hybrid.generate_key_pair(2048) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("Error generating keys: {}", e);
            return;
        }
    };

    let data = random_payload(1024 * 1024);
    println!("Payload: {} bytes", data.len());

    let start = Instant::now();
    let encrypted = match hybrid.encrypt(&data, &keys.public_key) {
        Ok(encrypted) => encrypted,
        Err(e) => {
            eprintln!("Encryption error: {}", e);
            return;
        }
    };
    println!("Encryption time: {:?}", start.elapsed());

    match unframe(&encrypted) {
        Ok((encrypted_key, encrypted_payload)) => {
            println!("Encrypted AES key: {} bytes", encrypted_key.len());
            println!("Encrypted payload: {} bytes", encrypted_payload.len());
        }
        Err(e) => eprintln!("Framing error: {}", e),
    }

    let start = Instant::now();
    match hybrid.decrypt(&encrypted, &keys.private_key) {
        Ok(decrypted) => {
            println!("Decryption time: {:?}", start.elapsed());
            println!(
                "Decryption validation: {}",
                if decrypted == data { "✓ Valid" } else { "✗ Invalid" }
            );
        }
        Err(e) => eprintln!("Decryption error: {}", e),
    }
    println!();
}
