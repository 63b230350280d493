use cipherbench::{AlgorithmProvider, RsaProvider};
use std::time::Instant;

fn print_hex(bytes: &[u8]) {
    for (i, byte) in bytes.iter().enumerate() {
        print!("{:02x}", byte);
        if (i + 1) % 32 == 0 {
            println!();
        }
    }
    println!();
}

fn main() {
    println!("\n=== RSA Example ===");
    println!();

    let rsa = RsaProvider::new();
    let start = Instant::now();
    match rsa.generate_key_pair(2048) {
        Ok(keys) => {
            println!("=== RSA Key Generation ===");
            println!("Generation time: {:?}", start.elapsed());
            println!(
                "Max plaintext: {} bytes",
                RsaProvider::max_plaintext_len(&keys.public_key)
            );

            let message = b"Lorem ipsum dolor sit amet";
            println!("\n=== Encryption Test ===");
            println!("Original message: {}", String::from_utf8_lossy(message));

            let start = Instant::now();
            match rsa.encrypt(message, &keys.public_key) {
                Ok(encrypted) => {
                    println!("\nEncryption time: {:?}", start.elapsed());
                    println!("Encrypted data ({} bytes):", encrypted.len());
                    print_hex(&encrypted);

                    let start = Instant::now();
                    match rsa.decrypt(&encrypted, &keys.private_key) {
                        Ok(decrypted) => {
                            println!("\nDecryption time: {:?}", start.elapsed());
                            println!("Decrypted message: {}", String::from_utf8_lossy(&decrypted));
                            let is_valid = message.to_vec() == decrypted;
                            println!(
                                "Decryption validation: {}",
                                if is_valid { "✓ Valid" } else { "✗ Invalid" }
                            );
                        }
                        Err(e) => eprintln!("Error decrypting message: {}", e),
                    }
                }
                Err(e) => eprintln!("Error encrypting message: {}", e),
            }

            println!("\n=== Size Limit Test ===");
            let oversized = vec![0u8; 300];
            match rsa.encrypt(&oversized, &keys.public_key) {
                Ok(_) => println!("✗ 300 bytes unexpectedly accepted"),
                Err(e) => println!("✓ Rejected: {}", e),
            }
            println!();
        }
        Err(e) => eprintln!("Error generating RSA keys: {}", e),
    }
}
